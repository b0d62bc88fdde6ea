use actmenu::prelude::*;
use std::rc::Rc;

struct LogPresenter;

impl MenuPresenter for LogPresenter {
    fn open(&self) {
        log::info!("Menu opened");
    }

    fn show(&self, surface: MenuSurface<'_>) {
        let titles: Vec<&str> = surface.menu.entries().iter().map(MenuEntry::title).collect();
        log::info!("Showing submenu of {}: {:?}", surface.parent, titles);
    }

    fn close(&self) {
        log::info!("Menu closed");
    }

    fn strip_attached(&self, role: StripRole) {
        log::info!("Attached {} strip header", role);
    }

    fn strip_detached(&self, role: StripRole) {
        log::info!("Detached {} strip header", role);
    }
}

/// Generates a fresh share target list every time it is opened.
struct ShareProvider {
    targets: Vec<&'static str>,
}

impl ActionProvider for ShareProvider {
    fn on_prepare_submenu(&self, submenu: &mut SubmenuController) {
        for target in &self.targets {
            submenu.add(*target);
        }
    }
}

fn print_list(menu: &MenuController) {
    for row in menu.header_rows() {
        println!("  [{} strip]", row);
    }
    for position in 0..menu.visible_count() {
        if let Some(entry) = menu.visible_entry_at(position) {
            let marker = if menu.is_row_enabled(position) { " " } else { "x" };
            println!("  {} {}", marker, entry.title());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = smol::block_on(MenuConfig::load())?;
    let queue = Rc::new(TaskQueue::new());
    let mut menu = MenuController::with_scheduler(config, queue.clone());

    menu.set_presenter(Some(Rc::new(LogPresenter)));
    menu.set_callback(Some(Rc::new(|entry: &MenuEntry| {
        println!("Selected {}", entry.title());
        true
    })));

    let reload = menu.add_entry(
        MenuEntry::new(1, 0, "Reload")
            .with_icon("reload")
            .with_display_mode(DisplayMode::Always),
    )?;
    menu.add_entry(
        MenuEntry::new(2, 0, "Bookmark")
            .with_icon("star")
            .with_display_mode(DisplayMode::IfRoom),
    )?;
    let share = menu.add_entry(
        MenuEntry::new(3, 10, "Share").with_action_provider(Rc::new(ShareProvider {
            targets: vec!["Mail", "Messages", "Copy link"],
        })),
    )?;
    let tools = menu.add_submenu(4, 20, "Tools")?;
    tools.add_item(5, 0, "Page info")?;
    tools.add_item(6, 1, "Inspect")?;
    let history = menu.add_item(7, 5, "History")?;

    println!("Menu rows:");
    print_list(&menu);

    menu.open();
    menu.select(share);
    menu.perform_identifier_action(6);

    // A worker thread renames an entry; the change lands on the next drain.
    let sender = menu.change_sender();
    std::thread::spawn(move || {
        sender.send(history, ChangeKind::Title("Recent history".into()));
        sender.send(reload, ChangeKind::Enabled(false));
    })
    .join()
    .map_err(|_| "change thread panicked")?;

    let applied = menu.apply_pending_changes();
    let refreshed = menu.run_deferred();
    log::info!("Applied {} changes, refreshed {} surrogates", applied, refreshed);

    menu.set_display_mode(reload, DisplayMode::Never);
    println!("After demoting Reload:");
    print_list(&menu);

    menu.clear()?;
    println!("Cleared, {} entries left", menu.len());
    Ok(())
}
