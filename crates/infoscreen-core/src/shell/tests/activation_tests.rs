use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::kernel::constants::FAILED_SCREEN_NAME;
use crate::kernel::error::Error;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::{
    CapabilityProbe, DependencyValidator, DescriptorBuilder, FailureRecord, ModuleLoader,
    ModuleRegistry, PluginDescriptor, Screen, ScreenContext, StaticCatalog,
};
use crate::shell::InfoScreen;
use crate::ui_bridge::{HeadlessContainer, TrackingResourceLoader};

struct TestScreen {
    name: String,
    unloads: Arc<AtomicUsize>,
}

impl Screen for TestScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        format!("This is {}", self.name)
    }

    fn unload(&mut self) {
        self.unloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// Panics from every hook after construction
struct FaultyScreen {
    name: String,
}

impl Screen for FaultyScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> String {
        panic!("render exploded");
    }

    fn unload(&mut self) {
        panic!("unload exploded");
    }
}

struct Harness {
    shell: InfoScreen,
    container: HeadlessContainer,
    resources: TrackingResourceLoader,
    constructed: Arc<AtomicUsize>,
    unloads: Arc<AtomicUsize>,
}

fn modules(constructed: &Arc<AtomicUsize>, unloads: &Arc<AtomicUsize>) -> ModuleRegistry {
    let constructed = Arc::clone(constructed);
    let unloads = Arc::clone(unloads);
    let mut modules = ModuleRegistry::new();
    modules.register("test", "TestScreen", move |ctx: ScreenContext| {
        constructed.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TestScreen {
            name: ctx.name,
            unloads: Arc::clone(&unloads),
        }) as Box<dyn Screen>)
    });
    modules.register("test", "FailingScreen", |_ctx: ScreenContext| Err("boom".into()));
    modules.register("test", "FaultyScreen", |ctx: ScreenContext| {
        Ok(Box::new(FaultyScreen { name: ctx.name }) as Box<dyn Screen>)
    });
    modules
}

fn harness(descriptors: Vec<PluginDescriptor>) -> Harness {
    let constructed = Arc::new(AtomicUsize::new(0));
    let unloads = Arc::new(AtomicUsize::new(0));
    let container = HeadlessContainer::new();
    let resources = TrackingResourceLoader::in_memory();

    let shell = InfoScreen::builder(
        StaticCatalog::new(descriptors),
        ModuleLoader::new(modules(&constructed, &unloads)),
    )
    .validator(DependencyValidator::new(CapabilityProbe::new(["present"])))
    .container(container.clone())
    .resources(resources.clone())
    .build();

    Harness {
        shell,
        container,
        resources,
        constructed,
        unloads,
    }
}

fn screen(name: &str) -> PluginDescriptor {
    PluginDescriptor::new(name, "test", "TestScreen")
}

#[test]
fn test_bulk_activation_without_failures() {
    let mut h = harness(vec![screen("A"), screen("B"), screen("C")]);
    let report = h.shell.activate_all().unwrap();

    assert_eq!(report.activated, vec!["A", "B", "C"]);
    assert!(!report.has_failures());
    assert_eq!(h.shell.available_screens(), ["A", "B", "C"]);
    assert_eq!(h.shell.current_screen(), Some("A"));
    assert!(!h.shell.registry().contains(FAILED_SCREEN_NAME));

    let ui = h.container.snapshot();
    assert_eq!(ui.widgets, vec!["A", "B", "C"]);
    assert_eq!(ui.current.as_deref(), Some("A"));
}

#[test]
fn test_unmet_dependency_yields_failure_screen() {
    let mut h = harness(vec![
        screen("A"),
        DescriptorBuilder::new("B", "test", "TestScreen")
            .dependency("missing")
            .build(),
        DescriptorBuilder::new("C", "test", "TestScreen")
            .dependency("present")
            .build(),
    ]);
    let report = h.shell.activate_all().unwrap();

    assert_eq!(h.shell.available_screens(), ["A", "C", FAILED_SCREEN_NAME]);
    assert_eq!(h.shell.current_screen(), Some(FAILED_SCREEN_NAME));
    assert!(!h.shell.registry().contains("B"));
    assert_eq!(
        report.failures,
        vec![FailureRecord::dependency("B", vec!["missing".to_string()])]
    );
    assert_eq!(report.dependency_failures().count(), 1);
    assert_eq!(report.load_failures().count(), 0);
    assert_eq!(h.constructed.load(Ordering::SeqCst), 2);

    assert_eq!(h.container.snapshot().current.as_deref(), Some(FAILED_SCREEN_NAME));
    let frame = h.shell.refresh().unwrap();
    assert!(frame.contains("Unmet dependencies:"));
    assert!(frame.contains("B: missing missing"));
}

#[test]
fn test_load_failures_are_reported_and_skipped() {
    let mut h = harness(vec![
        PluginDescriptor::new("Ghost", "ghost", "GhostScreen"),
        screen("A"),
        PluginDescriptor::new("Bad", "test", "FailingScreen"),
    ]);
    let report = h.shell.activate_all().unwrap();

    assert_eq!(report.activated, vec!["A"]);
    assert_eq!(
        report.failures,
        vec![
            FailureRecord::load("Ghost", "module 'ghost' not found"),
            FailureRecord::load("Bad", "boom"),
        ]
    );
    assert_eq!(h.shell.available_screens(), ["A", FAILED_SCREEN_NAME]);
    assert_eq!(h.shell.current_screen(), Some(FAILED_SCREEN_NAME));
}

#[test]
fn test_reserved_name_is_a_load_failure() {
    let mut h = harness(vec![screen(FAILED_SCREEN_NAME), screen("A")]);
    let report = h.shell.activate_all().unwrap();

    assert_eq!(report.activated, vec!["A"]);
    assert_eq!(
        report.failures,
        vec![FailureRecord::load(FAILED_SCREEN_NAME, "screen name is reserved")]
    );
    assert_eq!(h.constructed.load(Ordering::SeqCst), 1);
    assert_eq!(h.shell.available_screens(), ["A", FAILED_SCREEN_NAME]);
}

#[test]
fn test_duplicate_descriptors_are_skipped() {
    let mut h = harness(vec![screen("A"), screen("A"), screen("B")]);
    let report = h.shell.activate_all().unwrap();

    assert_eq!(report.activated, vec!["A", "B"]);
    assert_eq!(report.skipped, vec!["A"]);
    assert!(!report.has_failures());
    assert_eq!(h.shell.available_screens(), ["A", "B"]);
}

#[test]
fn test_empty_catalog() {
    let mut h = harness(Vec::new());
    let report = h.shell.activate_all().unwrap();

    assert!(report.activated.is_empty());
    assert_eq!(h.shell.current_screen(), None);
    assert_eq!(h.shell.refresh(), None);
    assert!(h.container.snapshot().current.is_none());
}

#[test]
fn test_disabled_plugins_are_not_activated() {
    let mut h = harness(vec![
        screen("A"),
        DescriptorBuilder::new("Off", "test", "TestScreen").disabled().build(),
    ]);
    h.shell.activate_all().unwrap();

    assert_eq!(h.shell.available_screens(), ["A"]);
    assert!(matches!(
        h.shell.add_screen("Off"),
        Err(Error::PluginSystem(PluginSystemError::ScreenNotFound(_)))
    ));
}

#[test]
fn test_remove_then_add_fires_unload_once() {
    let mut h = harness(vec![screen("A"), screen("B")]);
    h.shell.activate_all().unwrap();

    assert!(h.shell.remove_screen("A"));
    assert_eq!(h.unloads.load(Ordering::SeqCst), 1);
    assert_eq!(h.shell.available_screens(), ["B"]);
    assert_eq!(h.shell.current_screen(), Some("B"));
    assert_eq!(h.container.snapshot().widgets, vec!["B"]);

    let report = h.shell.add_screen("A").unwrap();
    assert_eq!(report.activated, vec!["A"]);
    assert_eq!(h.shell.available_screens(), ["B", "A"]);
    assert_eq!(h.shell.current_screen(), Some("A"));
    assert_eq!(h.unloads.load(Ordering::SeqCst), 1);
    assert_eq!(h.container.snapshot().current.as_deref(), Some("A"));
}

#[test]
fn test_add_active_screen_reloads_it() {
    let mut h = harness(vec![screen("A"), screen("B")]);
    h.shell.activate_all().unwrap();

    let report = h.shell.add_screen("A").unwrap();
    assert_eq!(report.activated, vec!["A"]);
    assert_eq!(h.unloads.load(Ordering::SeqCst), 1);
    assert_eq!(h.constructed.load(Ordering::SeqCst), 3);
    assert_eq!(h.shell.available_screens(), ["B", "A"]);
    assert_eq!(h.shell.registry().len(), 2);
}

#[test]
fn test_add_unknown_screen_leaves_state_unchanged() {
    let mut h = harness(vec![screen("A")]);
    h.shell.activate_all().unwrap();
    let before = h.shell.navigation().state().clone();

    let result = h.shell.add_screen("Nope");
    assert!(matches!(
        result,
        Err(Error::PluginSystem(PluginSystemError::ScreenNotFound(ref name))) if name == "Nope"
    ));
    assert_eq!(h.shell.navigation().state(), &before);
    assert!(!h.shell.registry().contains(FAILED_SCREEN_NAME));
}

#[test]
fn test_reload_unknown_screen_removes_nothing() {
    let mut h = harness(vec![screen("A")]);
    h.shell.activate_all().unwrap();

    assert!(h.shell.reload_screen("Nope").is_err());
    assert_eq!(h.unloads.load(Ordering::SeqCst), 0);
    assert_eq!(h.shell.available_screens(), ["A"]);
}

#[test]
fn test_failed_add_installs_single_failure_screen() {
    let mut h = harness(vec![
        screen("A"),
        PluginDescriptor::new("Bad", "test", "FailingScreen"),
    ]);
    h.shell.activate_descriptors(&[screen("A")]);
    assert!(!h.shell.registry().contains(FAILED_SCREEN_NAME));

    let report = h.shell.add_screen("Bad").unwrap();
    assert_eq!(report.failures, vec![FailureRecord::load("Bad", "boom")]);
    assert_eq!(h.shell.available_screens(), ["A", FAILED_SCREEN_NAME]);
    assert_eq!(h.shell.current_screen(), Some(FAILED_SCREEN_NAME));

    h.shell.switch_to("A");
    h.shell.add_screen("Bad").unwrap();
    assert_eq!(h.shell.available_screens(), ["A", FAILED_SCREEN_NAME]);
    assert_eq!(h.shell.current_screen(), Some(FAILED_SCREEN_NAME));
    assert_eq!(
        h.container
            .snapshot()
            .widgets
            .iter()
            .filter(|w| *w == FAILED_SCREEN_NAME)
            .count(),
        1
    );
}

#[test]
fn test_remove_unknown_screen() {
    let mut h = harness(vec![screen("A")]);
    h.shell.activate_all().unwrap();

    assert!(!h.shell.remove_screen("Nope"));
    assert_eq!(h.shell.available_screens(), ["A"]);
}

#[test]
fn test_removing_every_screen_clears_current() {
    let mut h = harness(vec![screen("A"), screen("B")]);
    h.shell.activate_all().unwrap();

    h.shell.remove_screen("A");
    h.shell.remove_screen("B");
    assert_eq!(h.shell.current_screen(), None);
    assert!(h.shell.registry().is_empty());
    assert!(h.container.snapshot().current.is_none());
}

#[test]
fn test_resources_follow_screen_lifecycle() {
    let mut h = harness(vec![
        DescriptorBuilder::new("A", "test", "TestScreen")
            .resource("screens/a/a.kv")
            .build(),
        DescriptorBuilder::new("Bad", "test", "FailingScreen")
            .resource("screens/bad/bad.kv")
            .build(),
    ]);
    h.shell.activate_all().unwrap();

    assert_eq!(h.resources.load_count(Path::new("screens/a/a.kv")), 1);
    // Released again after the failed load
    assert_eq!(h.resources.load_count(Path::new("screens/bad/bad.kv")), 0);

    h.shell.remove_screen("A");
    assert_eq!(h.resources.load_count(Path::new("screens/a/a.kv")), 0);

    // Nothing left to release, tolerated
    h.shell.remove_screen("A");
    assert_eq!(h.resources.load_count(Path::new("screens/a/a.kv")), 0);
}

#[test]
fn test_unreadable_resource_is_a_load_failure() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let unloads = Arc::new(AtomicUsize::new(0));
    let mut shell = InfoScreen::builder(
        StaticCatalog::new(vec![
            DescriptorBuilder::new("A", "test", "TestScreen")
                .resource("/definitely/not/here/a.kv")
                .build(),
        ]),
        ModuleLoader::new(modules(&constructed, &unloads)),
    )
    .resources(TrackingResourceLoader::new())
    .build();

    let report = shell.activate_all().unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].plugin_name(), "A");
    assert!(!report.failures[0].is_dependency_failure());
    assert_eq!(constructed.load(Ordering::SeqCst), 0);
    assert_eq!(shell.available_screens(), [FAILED_SCREEN_NAME]);
}

#[test]
fn test_shutdown_unloads_every_screen() {
    let mut h = harness(vec![screen("A"), screen("B"), screen("C")]);
    h.shell.activate_all().unwrap();

    h.shell.shutdown();
    assert_eq!(h.unloads.load(Ordering::SeqCst), 3);
    assert!(h.shell.registry().is_empty());
    assert!(h.container.snapshot().widgets.is_empty());
}

#[test]
fn test_panicking_screen_hooks_do_not_escape() {
    let mut h = harness(vec![PluginDescriptor::new("A", "test", "FaultyScreen"), screen("B")]);
    h.shell.activate_all().unwrap();
    assert_eq!(h.shell.current_screen(), Some("A"));
    assert_eq!(h.shell.refresh(), None);

    assert!(h.shell.remove_screen("A"));
    assert!(!h.shell.registry().contains("A"));
    assert_eq!(h.shell.registry().names(), ["B"]);
    assert_eq!(h.shell.available_screens(), ["B"]);
    assert_eq!(h.container.snapshot().widgets, vec!["B"]);
    assert_eq!(h.shell.refresh(), Some("This is B".to_string()));
}

#[test]
fn test_shutdown_survives_panicking_unload() {
    let mut h = harness(vec![screen("A"), PluginDescriptor::new("B", "test", "FaultyScreen"), screen("C")]);
    h.shell.activate_all().unwrap();

    h.shell.shutdown();
    assert_eq!(h.unloads.load(Ordering::SeqCst), 2);
    assert!(h.shell.registry().is_empty());
    assert!(h.shell.available_screens().is_empty());
}
