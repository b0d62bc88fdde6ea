mod common;

use actmenu_core::config::MenuConfig;
use actmenu_core::error::MenuError;
use actmenu_core::menu::{
    same_surrogate, share, ActionProvider, ChangeKind, DisplayMode, MenuController, MenuEntry,
    Placement, ProviderView, RowKind, Selection, SharedSurrogate, StripRole, SubmenuController,
    Surrogate, SurrogateKind,
};
use actmenu_core::tasks::TaskQueue;
use common::{
    recording_callback, CountingProvider, FailingStrip, RecordingFactory, RecordingPresenter,
};
use std::cell::RefCell;
use std::rc::Rc;

struct Fixture {
    menu: MenuController,
    presenter: Rc<RecordingPresenter>,
    factory: Rc<RecordingFactory>,
    queue: Rc<TaskQueue>,
    seen: Rc<RefCell<Vec<i32>>>,
}

fn fixture_with(config: MenuConfig) -> Fixture {
    let queue = Rc::new(TaskQueue::new());
    let factory = Rc::new(RecordingFactory::default());
    let mut menu = MenuController::with_scheduler(config, queue.clone())
        .with_surrogate_factory(factory.clone());

    let presenter = Rc::new(RecordingPresenter::default());
    menu.set_presenter(Some(presenter.clone()));
    let (seen, callback) = recording_callback();
    menu.set_callback(Some(callback));

    Fixture {
        menu,
        presenter,
        factory,
        queue,
        seen,
    }
}

fn fixture() -> Fixture {
    fixture_with(MenuConfig::default())
}

fn action(id: i32, title: &str, mode: DisplayMode) -> MenuEntry {
    MenuEntry::new(id, 0, title).with_display_mode(mode)
}

fn list_titles(menu: &MenuController) -> Vec<String> {
    (0..menu.visible_count())
        .filter_map(|position| menu.visible_entry_at(position))
        .map(|entry| entry.title().to_string())
        .collect()
}

#[test]
fn test_projection_orders_by_priority() {
    let mut f = fixture();
    f.menu.add_item(1, 30, "thirty").unwrap();
    f.menu.add_item(2, 10, "ten").unwrap();
    f.menu.add_item(3, 20, "twenty").unwrap();

    assert_eq!(list_titles(&f.menu), vec!["ten", "twenty", "thirty"]);
    assert_eq!(f.menu.item_at(0).map(MenuEntry::id), Some(2));
}

#[test]
fn test_always_entry_is_findable_but_not_list_visible() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(action(1, "Reload", DisplayMode::Always))
        .unwrap();

    assert_eq!(f.menu.find_by_id(1).map(MenuEntry::key), Some(key));
    assert!(!f.menu.has_visible_items());
    assert_eq!(f.menu.visible_count(), 0);
    assert!(f.menu.strip(StripRole::Primary).contains(key));
    assert_eq!(f.presenter.events(), vec!["attach primary"]);
}

#[test]
fn test_hidden_list_entries_do_not_count_as_visible() {
    let mut f = fixture();
    f.menu
        .add_entry(MenuEntry::new(1, 0, "Hidden").with_visible(false))
        .unwrap();

    assert!(!f.menu.has_visible_items());
    assert_eq!(f.menu.len(), 1);
    assert!(f.menu.find_by_id(1).is_some());
}

#[test]
fn test_disabled_selection_neither_dispatches_nor_closes() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(MenuEntry::new(1, 0, "Print").with_enabled(false))
        .unwrap();

    assert_eq!(f.menu.select(key), Selection::Ignored);
    assert_eq!(f.menu.on_row_activated(0), Selection::Ignored);
    assert!(!f.menu.is_row_enabled(0));
    assert!(f.seen.borrow().is_empty());
    assert_eq!(f.presenter.count("close"), 0);
}

#[test]
fn test_terminal_selection_closes_then_dispatches() {
    let mut f = fixture();
    f.menu.add_item(1, 0, "Settings").unwrap();

    assert_eq!(f.menu.select_at(0), Selection::Dispatched { handled: true });
    assert_eq!(*f.seen.borrow(), vec![1]);
    assert_eq!(f.presenter.events(), vec!["close"]);
    assert_eq!(f.menu.select_at(1), Selection::NotFound);
}

#[test]
fn test_provider_submenu_prepared_once_per_selection() {
    let mut f = fixture();
    let provider = CountingProvider::new(vec!["Mail", "Copy link"]);
    let key = f
        .menu
        .add_entry(MenuEntry::new(1, 0, "Share").with_action_provider(provider.clone()))
        .unwrap();

    assert_eq!(f.menu.row_kind(0), Some(RowKind::ActionMode));
    assert_eq!(f.menu.select(key), Selection::OpenedSubmenu);
    assert_eq!(provider.prepared.get(), 1);
    assert_eq!(f.presenter.events(), vec!["show Mail,Copy link"]);

    assert_eq!(f.menu.select(key), Selection::OpenedSubmenu);
    assert_eq!(provider.prepared.get(), 2);

    // Regenerated from scratch, not appended to.
    let submenu = f.menu.submenu(key).unwrap();
    assert_eq!(submenu.len(), 2);
    assert!(submenu.show_icons());
    assert_eq!(submenu.parent_entry(), key);
    assert!(f.seen.borrow().is_empty());
}

#[test]
fn test_plain_submenu_is_shown_without_dispatch() {
    let mut f = fixture();
    let tools = f.menu.add_submenu(1, 0, "Tools").unwrap();
    tools.add_item(2, 0, "Page info").unwrap();
    let key = tools.parent_entry();

    assert_eq!(f.menu.select(key), Selection::OpenedSubmenu);
    assert_eq!(f.presenter.events(), vec!["show Page info"]);
    assert!(f.seen.borrow().is_empty());
}

#[test]
fn test_secondary_strip_detached_exactly_once() {
    let mut f = fixture();
    f.menu
        .add_entry(action(1, "Bookmark", DisplayMode::IfRoom))
        .unwrap();
    f.menu
        .add_entry(action(2, "Find", DisplayMode::IfRoom))
        .unwrap();
    assert_eq!(f.menu.header_rows(), &[StripRole::Secondary]);

    assert!(f.menu.remove_by_id(1).is_some());
    assert_eq!(f.presenter.count("detach secondary"), 0);
    assert!(f.menu.remove_by_id(2).is_some());

    assert_eq!(f.presenter.count("attach secondary"), 1);
    assert_eq!(f.presenter.count("detach secondary"), 1);
    assert_eq!(f.menu.header_count(), 0);
    assert!(f.menu.is_empty());
}

#[test]
fn test_refused_placement_falls_back_to_list() {
    let mut f = fixture_with(MenuConfig {
        secondary_strip_capacity: Some(1),
        ..MenuConfig::default()
    });
    let first = f
        .menu
        .add_entry(action(1, "Bookmark", DisplayMode::IfRoom))
        .unwrap();
    let second = f
        .menu
        .add_entry(action(2, "Find", DisplayMode::IfRoom))
        .unwrap();

    assert_eq!(
        f.menu.entry(first).unwrap().placement(),
        Placement::Strip(StripRole::Secondary)
    );
    assert_eq!(f.menu.entry(second).unwrap().placement(), Placement::List);
    assert_eq!(list_titles(&f.menu), vec!["Find"]);
    assert!(f.menu.has_visible_items());
}

#[test]
fn test_display_mode_toggle_moves_entry() {
    let mut f = fixture();
    let key = f.menu.add_item(1, 0, "Reader").unwrap();

    assert!(f.menu.set_display_mode(key, DisplayMode::Always));
    assert!(f.menu.strip(StripRole::Primary).contains(key));
    assert_eq!(f.menu.visible_count(), 0);

    assert!(f.menu.set_display_mode(key, DisplayMode::IfRoom));
    assert!(!f.menu.strip(StripRole::Primary).contains(key));
    assert!(f.menu.strip(StripRole::Secondary).contains(key));

    assert!(f.menu.set_display_mode(key, DisplayMode::Never));
    assert_eq!(f.menu.entry(key).unwrap().placement(), Placement::List);
    assert!(f.menu.strip(StripRole::Secondary).is_empty());
    assert_eq!(list_titles(&f.menu), vec!["Reader"]);

    assert_eq!(
        f.presenter.events(),
        vec![
            "attach primary",
            "detach primary",
            "attach secondary",
            "detach secondary"
        ]
    );
}

#[test]
fn test_strip_refresh_waits_for_drain() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(action(1, "Reload", DisplayMode::Always))
        .unwrap();
    let button = f.factory.last_button();

    assert!(f.menu.set_title(key, "Stop"));
    assert_eq!(button.borrow().state().title(), Some("Reload"));
    assert_eq!(f.queue.len(), 1);

    assert_eq!(f.menu.run_deferred(), 1);
    assert_eq!(button.borrow().state().title(), Some("Stop"));
    assert_eq!(button.borrow().state().render_count(), 2);
}

#[test]
fn test_hidden_strip_entry_hides_surrogate() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(action(1, "Reload", DisplayMode::Always))
        .unwrap();
    let button = f.factory.last_button();
    assert!(button.borrow().is_visible());

    f.menu.set_visible(key, false);
    f.menu.run_deferred();

    assert!(!button.borrow().is_visible());
    assert_eq!(button.borrow().state().render_count(), 1);
    // Still strip-placed, and still not a list row.
    assert!(f.menu.strip(StripRole::Primary).contains(key));
    assert!(!f.menu.has_visible_items());
}

#[test]
fn test_refresh_for_removed_entry_is_dropped() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(action(1, "Reload", DisplayMode::Always))
        .unwrap();
    let button = f.factory.last_button();

    f.menu.set_title(key, "Stop");
    let removed = f.menu.remove_entry(key).unwrap();
    assert_eq!(removed.placement(), Placement::List);

    assert_eq!(f.menu.run_deferred(), 1);
    assert_eq!(button.borrow().state().title(), Some("Reload"));
    assert_eq!(button.borrow().state().render_count(), 1);
}

#[test]
fn test_clear_finishes_despite_failing_host_strip() {
    let mut f = fixture();
    let held = FailingStrip::default();
    let count = held.held.clone();
    f.menu.set_primary_strip_presenter(Box::new(held));

    f.menu
        .add_entry(action(1, "Reload", DisplayMode::Always))
        .unwrap();
    f.menu.add_item(2, 0, "Settings").unwrap();
    let tools = f.menu.add_submenu(3, 0, "Tools").unwrap();
    tools.add_item(4, 0, "Inspect").unwrap();
    tools.add_entry(action(5, "Pin", DisplayMode::Always)).unwrap();
    assert_eq!(count.get(), 1);

    let result = f.menu.clear();

    assert!(matches!(result, Err(MenuError::StripRemoval(_))));
    assert!(f.menu.is_empty());
    assert!(f.menu.strip(StripRole::Primary).is_empty());
    assert!(f.menu.strip(StripRole::Secondary).is_empty());
    assert!(f.menu.find_by_id(4).is_none());
    assert_eq!(f.menu.visible_count(), 0);
    assert_eq!(f.presenter.count("attach primary"), 0);
}

#[test]
fn test_external_primary_presenter_adopts_placed_entries() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(action(1, "Reload", DisplayMode::Always))
        .unwrap();
    assert_eq!(f.menu.header_count(), 1);

    let toolbar = FailingStrip::default();
    let held = toolbar.held.clone();
    f.menu.set_primary_strip_presenter(Box::new(toolbar));

    assert_eq!(held.get(), 1);
    assert!(f.menu.strip(StripRole::Primary).is_external());
    assert_eq!(
        f.menu.entry(key).unwrap().placement(),
        Placement::Strip(StripRole::Primary)
    );
    assert_eq!(f.menu.header_count(), 0);
    assert_eq!(f.presenter.events(), vec!["attach primary", "detach primary"]);
}

#[test]
fn test_submenu_entries_stay_in_the_list() {
    let mut f = fixture();
    let tools = f.menu.add_submenu(1, 0, "Tools").unwrap();
    let pin = tools.add_entry(action(2, "Pin", DisplayMode::Always)).unwrap();

    assert_eq!(tools.entry(pin).unwrap().placement(), Placement::List);
    assert_eq!(tools.visible_count(), 1);
    assert_eq!(tools.header_count(), 0);
}

#[test]
fn test_collaborators_propagate_to_submenus() {
    let mut f = fixture();
    let tools = f.menu.add_submenu(1, 0, "Tools").unwrap();
    let inspect = tools.add_item(2, 0, "Inspect").unwrap();
    let tools_key = tools.parent_entry();

    let replacement = Rc::new(RecordingPresenter::default());
    f.menu.set_presenter(Some(replacement.clone()));
    let (seen, callback) = recording_callback();
    f.menu.set_callback(Some(callback));

    let submenu = f.menu.submenu(tools_key).unwrap();
    let presenter = submenu.presenter().unwrap();
    assert!(std::ptr::addr_eq(Rc::as_ptr(presenter), Rc::as_ptr(&replacement)));

    assert_eq!(
        f.menu.select(inspect),
        Selection::Dispatched { handled: true }
    );
    assert_eq!(*seen.borrow(), vec![2]);
    assert!(f.seen.borrow().is_empty());
    assert_eq!(replacement.events(), vec!["close"]);
}

#[test]
fn test_find_by_id_skips_provider_submenus() {
    let mut f = fixture();
    let provider = CountingProvider::new(vec!["Mail"]);
    let key = f
        .menu
        .add_entry(MenuEntry::new(1, 0, "Share").with_action_provider(provider))
        .unwrap();
    f.menu.select(key);

    assert!(f.menu.find_by_id(100).is_none());
    assert!(f.menu.remove_by_id(100).is_none());
    assert!(f.menu.submenu(key).unwrap().find_by_id(100).is_some());
}

#[test]
fn test_nested_lookup_and_removal() {
    let mut f = fixture();
    let tools = f.menu.add_submenu(3, 0, "Tools").unwrap();
    tools.add_item(4, 0, "Inspect").unwrap();
    let deeper = tools.add_submenu(5, 1, "Deeper").unwrap();
    deeper.add_item(6, 0, "Profile").unwrap();

    assert_eq!(f.menu.find_by_id(6).map(MenuEntry::title), Some("Profile"));
    assert!(matches!(
        f.menu.add_item(6, 0, "Again"),
        Err(MenuError::DuplicateId(6))
    ));

    let removed = f.menu.remove_by_id(6).unwrap();
    assert_eq!(removed.title(), "Profile");
    assert!(f.menu.find_by_id(6).is_none());
    assert!(f.menu.find_by_id(4).is_some());
}

#[test]
fn test_ids_are_unique_across_the_tree() {
    let mut f = fixture();
    f.menu.add_item(1, 0, "Settings").unwrap();
    let tools = f.menu.add_submenu(2, 1, "Tools").unwrap();
    tools.add_item(3, 0, "Inspect").unwrap();
    let view = f.menu.add_submenu(4, 2, "View").unwrap();

    assert!(matches!(
        view.add_item(1, 0, "Again"),
        Err(MenuError::DuplicateId(1))
    ));
    assert!(matches!(
        view.add_item(3, 0, "Again"),
        Err(MenuError::DuplicateId(3))
    ));
    assert!(view.is_empty());
    let view_key = view.parent_entry();

    // Removed ids are free again, at any depth.
    assert!(f.menu.remove_by_id(1).is_some());
    f.menu
        .submenu_mut(view_key)
        .unwrap()
        .add_item(1, 0, "Zoom")
        .unwrap();
    assert_eq!(f.menu.find_by_id(1).map(MenuEntry::title), Some("Zoom"));

    // So are the ids inside a removed submenu.
    assert!(f.menu.remove_by_id(2).is_some());
    f.menu.add_item(3, 0, "Inspect").unwrap();
}

#[test]
fn test_provider_submenus_have_their_own_ids() {
    let mut f = fixture();
    f.menu.add_item(100, 0, "Downloads").unwrap();
    let provider = CountingProvider::new(vec!["Mail"]);
    let key = f
        .menu
        .add_entry(MenuEntry::new(1, 1, "Share").with_action_provider(provider.clone()))
        .unwrap();

    assert_eq!(f.menu.select(key), Selection::OpenedSubmenu);
    assert_eq!(f.menu.select(key), Selection::OpenedSubmenu);
    assert_eq!(provider.prepared.get(), 2);
    assert_eq!(f.menu.find_by_id(100).map(MenuEntry::title), Some("Downloads"));
    assert!(matches!(
        f.menu.add_item(100, 0, "Again"),
        Err(MenuError::DuplicateId(100))
    ));
}

#[test]
fn test_clear_empties_submenus_between_siblings() {
    let mut f = fixture();
    f.menu.add_item(1, 0, "Settings").unwrap();
    let tools = f.menu.add_submenu(2, 1, "Tools").unwrap();
    tools.add_item(3, 0, "Inspect").unwrap();
    tools
        .add_submenu(4, 1, "Deeper")
        .unwrap()
        .add_item(5, 0, "Profile")
        .unwrap();
    f.menu
        .add_entry(action(6, "Reload", DisplayMode::Always))
        .unwrap();

    assert!(f.menu.clear().is_ok());

    assert!(f.menu.is_empty());
    assert_eq!(f.menu.header_count(), 0);
    assert!(f.menu.find_by_id(5).is_none());
    // Nothing of the old tree holds on to its ids.
    for id in 1..=6 {
        f.menu.add_item(id, 0, "Again").unwrap();
    }
    assert_eq!(f.menu.len(), 6);
}

#[test]
fn test_sentinel_id_matches_nothing() {
    let mut f = fixture();
    f.menu.add("Untitled one");
    f.menu.add("Untitled two");

    assert_eq!(f.menu.len(), 2);
    assert!(f.menu.find_by_id(0).is_none());
    assert!(f.menu.remove_by_id(0).is_none());
}

#[test]
fn test_strip_surrogate_activation_runs_selection() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(action(1, "Reload", DisplayMode::Always))
        .unwrap();
    let surrogate = f.menu.strip_surrogate(key).cloned().unwrap();

    assert_eq!(
        f.menu.on_surrogate_activated(&surrogate),
        Selection::Dispatched { handled: true }
    );
    assert_eq!(*f.seen.borrow(), vec![1]);

    let stray: SharedSurrogate = f.factory.last_button();
    f.menu.remove_entry(key);
    assert_eq!(f.menu.on_surrogate_activated(&stray), Selection::NotFound);
}

#[test]
fn test_show_icons_reaches_strip_surrogates() {
    let mut f = fixture();
    f.menu
        .add_entry(action(1, "Reload", DisplayMode::Always).with_icon("reload"))
        .unwrap();
    let button = f.factory.last_button();
    assert!(!button.borrow().state().shows_icon());
    assert_eq!(button.borrow().label(), Some("Reload"));

    f.menu.set_show_icons(true);

    assert!(button.borrow().state().shows_icon());
    assert_eq!(button.borrow().state().icon(), Some("reload"));
    assert_eq!(button.borrow().label(), None);
}

struct GaugeProvider;

impl ActionProvider for GaugeProvider {
    fn on_prepare_submenu(&self, _submenu: &mut SubmenuController) {}

    fn has_submenu(&self) -> bool {
        false
    }

    fn create_surrogate(&self, _entry: &MenuEntry) -> Option<SharedSurrogate> {
        Some(share(ProviderView::new(2)))
    }
}

#[test]
fn test_render_row_recycles_plain_rows_only() {
    let mut f = fixture();
    let first = f.menu.add_item(1, 0, "First").unwrap();
    let second = f.menu.add_item(2, 1, "Second").unwrap();
    f.menu
        .add_entry(MenuEntry::new(3, 2, "Zoom").with_action_provider(Rc::new(GaugeProvider)))
        .unwrap();

    let row = f.menu.render_row(0, None).unwrap();
    assert_eq!(row.borrow().entry(), Some(first));

    let reused = f.menu.render_row(1, Some(row.clone())).unwrap();
    assert!(same_surrogate(&row, &reused));
    assert_eq!(reused.borrow().entry(), Some(second));

    let gauge = f.menu.render_row(2, Some(row.clone())).unwrap();
    assert!(!same_surrogate(&row, &gauge));
    assert_eq!(gauge.borrow().kind(), SurrogateKind::ProviderView);

    let fresh = f.menu.render_row(0, Some(gauge)).unwrap();
    assert_eq!(fresh.borrow().kind(), SurrogateKind::Row);
    assert!(f.menu.render_row(3, None).is_none());
}

#[test]
fn test_provider_strip_surrogate_weighs_its_children() {
    let mut f = fixture();
    let key = f
        .menu
        .add_entry(
            action(1, "Zoom", DisplayMode::Always).with_action_provider(Rc::new(GaugeProvider)),
        )
        .unwrap();

    let surrogate = f.menu.strip_surrogate(key).unwrap();
    assert_eq!(surrogate.borrow().kind(), SurrogateKind::ProviderView);
    assert_eq!(surrogate.borrow().weight(), 2.0);
    assert!(f.factory.buttons.borrow().is_empty());
}

#[test]
fn test_changes_from_other_threads_apply_in_order() {
    let mut f = fixture();
    let key = f.menu.add_item(1, 0, "Downloads").unwrap();
    let sender = f.menu.change_sender();

    std::thread::spawn(move || {
        sender.send(key, ChangeKind::DisplayMode(DisplayMode::Always));
        sender.send(key, ChangeKind::Title("Downloads (2)".into()));
    })
    .join()
    .unwrap();

    assert_eq!(f.menu.entry(key).unwrap().placement(), Placement::List);
    assert_eq!(f.menu.apply_pending_changes(), 2);
    assert_eq!(
        f.menu.entry(key).unwrap().placement(),
        Placement::Strip(StripRole::Primary)
    );

    f.menu.run_deferred();
    let button = f.factory.last_button();
    assert_eq!(button.borrow().state().title(), Some("Downloads (2)"));
    assert_eq!(f.menu.apply_pending_changes(), 0);
}

#[test]
fn test_perform_identifier_action_selects_nested_entry() {
    let mut f = fixture();
    let tools = f.menu.add_submenu(1, 0, "Tools").unwrap();
    tools.add_item(2, 0, "Inspect").unwrap();

    assert_eq!(
        f.menu.perform_identifier_action(2),
        Selection::Dispatched { handled: true }
    );
    assert_eq!(f.menu.perform_identifier_action(9), Selection::NotFound);
    assert_eq!(*f.seen.borrow(), vec![2]);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "menu callback must be set")]
fn test_missing_callback_is_a_debug_assertion() {
    let mut menu = MenuController::default();
    let key = menu.add_item(1, 0, "Orphan").unwrap();
    menu.select(key);
}
