use crate::navigation::StepPolicy;
use crate::plugin_system::{
    ModuleLoader, ModuleRegistry, PluginDescriptor, Screen, ScreenContext, StaticCatalog,
};
use crate::shell::{InfoScreen, ShellCommand, ShellStatus};

struct PlainScreen {
    name: String,
}

impl Screen for PlainScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        self.name.clone()
    }
}

/// Locks navigation as soon as it is constructed and unlocks on unload
struct KioskScreen {
    name: String,
    master: crate::shell::ShellHandle,
}

impl Screen for KioskScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        "kiosk".to_string()
    }

    fn unload(&mut self) {
        let _ = self.master.toggle_lock(Some(false));
    }
}

fn shell_with(names: &[&str], policy: StepPolicy) -> InfoScreen {
    let mut modules = ModuleRegistry::new();
    modules.register("plain", "PlainScreen", |ctx: ScreenContext| {
        Ok(Box::new(PlainScreen { name: ctx.name }) as Box<dyn Screen>)
    });

    let descriptors: Vec<PluginDescriptor> = names
        .iter()
        .map(|name| PluginDescriptor::new(name, "plain", "PlainScreen"))
        .collect();

    let mut shell = InfoScreen::builder(StaticCatalog::new(descriptors), ModuleLoader::new(modules))
        .step_policy(policy)
        .build();
    shell.activate_all().unwrap();
    shell
}

#[test]
fn test_next_follows_example_sequence() {
    let mut shell = shell_with(&["A", "B", "C"], StepPolicy::Mirrored);
    shell.next_screen(false);
    assert_eq!(shell.current_screen(), Some("C"));
    shell.next_screen(false);
    assert_eq!(shell.current_screen(), Some("B"));
    shell.next_screen(true);
    assert_eq!(shell.current_screen(), Some("C"));
}

#[test]
fn test_legacy_policy_through_builder() {
    let mut shell = shell_with(&["A", "B", "C"], StepPolicy::Legacy);
    assert_eq!(shell.navigation().policy(), StepPolicy::Legacy);
    shell.next_screen(true);
    assert_eq!(shell.current_screen(), Some("C"));
}

#[test]
fn test_n_steps_return_to_start() {
    let mut shell = shell_with(&["A", "B", "C", "D"], StepPolicy::Mirrored);
    let start = shell.navigation().index();
    for _ in 0..4 {
        shell.next_screen(false);
    }
    assert_eq!(shell.navigation().index(), start);
}

#[test]
fn test_lock_freezes_navigation() {
    let mut shell = shell_with(&["A", "B"], StepPolicy::Mirrored);
    assert!(shell.toggle_lock(None));
    shell.next_screen(false);
    shell.next_screen(true);
    assert_eq!(shell.current_screen(), Some("A"));

    assert!(!shell.toggle_lock(None));
    shell.next_screen(false);
    assert_eq!(shell.current_screen(), Some("B"));
}

#[test]
fn test_switch_to_unknown_is_ignored() {
    let mut shell = shell_with(&["A", "B"], StepPolicy::Mirrored);
    assert!(!shell.switch_to("Z"));
    assert_eq!(shell.current_screen(), Some("A"));
    assert!(shell.switch_to("B"));
    assert_eq!(shell.current_screen(), Some("B"));
}

#[test]
fn test_process_pending_applies_queued_commands() {
    let mut shell = shell_with(&["A", "B", "C"], StepPolicy::Mirrored);
    let handle = shell.handle();

    handle.switch_to("C").unwrap();
    handle.next().unwrap();
    handle.remove_screen("A").unwrap();
    assert_eq!(shell.process_pending(), ShellStatus::Running);

    assert_eq!(shell.available_screens(), ["B", "C"]);
    assert_eq!(shell.current_screen(), Some("B"));
}

#[test]
fn test_failed_command_does_not_stop_processing() {
    let mut shell = shell_with(&["A", "B"], StepPolicy::Mirrored);
    let handle = shell.handle();

    handle.add_screen("Nope").unwrap();
    handle.switch_to("B").unwrap();
    assert_eq!(shell.process_pending(), ShellStatus::Running);
    assert_eq!(shell.current_screen(), Some("B"));
}

#[test]
fn test_shutdown_command_stops_processing() {
    let mut shell = shell_with(&["A", "B"], StepPolicy::Mirrored);
    let handle = shell.handle();

    handle.shutdown().unwrap();
    handle.switch_to("B").unwrap();
    assert_eq!(shell.process_pending(), ShellStatus::Shutdown);
    assert_eq!(shell.current_screen(), Some("A"));
}

#[test]
fn test_constructor_and_unload_callbacks_are_queued() {
    let mut modules = ModuleRegistry::new();
    modules.register("plain", "KioskScreen", |ctx: ScreenContext| {
        ctx.master.toggle_lock(Some(true))?;
        Ok(Box::new(KioskScreen { name: ctx.name, master: ctx.master }) as Box<dyn Screen>)
    });
    let mut shell = InfoScreen::builder(
        StaticCatalog::new(vec![PluginDescriptor::new("Kiosk", "plain", "KioskScreen")]),
        ModuleLoader::new(modules),
    )
    .build();

    shell.activate_all().unwrap();
    assert!(!shell.is_locked());
    shell.process_pending();
    assert!(shell.is_locked());

    shell.remove_screen("Kiosk");
    shell.process_pending();
    assert!(!shell.is_locked());
}

#[tokio::test]
async fn test_next_command_receives_from_other_tasks() {
    let mut shell = shell_with(&["A", "B"], StepPolicy::Mirrored);
    let handle = shell.handle();

    tokio::spawn(async move {
        handle.next().unwrap();
    });

    let command = shell.next_command().await;
    assert_eq!(command, Some(ShellCommand::Next { reverse: false }));
    shell.execute(command.unwrap()).unwrap();
    assert_eq!(shell.current_screen(), Some("B"));
}
