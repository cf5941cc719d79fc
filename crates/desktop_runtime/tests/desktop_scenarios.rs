use desktop_runtime::{DesktopConfig, DesktopRuntime, WindowId, WindowStatus};
use platform_host::{MemoryVirtualFs, VirtualFsService};
use pretty_assertions::assert_eq;

fn runtime() -> DesktopRuntime {
    DesktopRuntime::new(DesktopConfig::default())
}

fn eval(runtime: &mut DesktopRuntime, line: &str) -> String {
    runtime.evaluate(line, None).expect("evaluate")
}

fn focused_count(runtime: &DesktopRuntime) -> usize {
    runtime.state().windows.iter().filter(|w| w.focused).count()
}

#[test]
fn first_window_on_empty_registry() {
    let mut runtime = runtime();
    let id = runtime.open_window("terminal", None).expect("window");
    let record = runtime.state().window(&id).expect("record");
    assert_eq!(record.status, WindowStatus::Open);
    assert!(record.focused);
    assert_eq!(record.z_index, 100);
    assert_eq!((record.rect.x, record.rect.y), (100.0, 50.0));
}

#[test]
fn fluxo_move_reports_and_applies() {
    let mut runtime = runtime();
    runtime.open_window("terminal", None);
    let out = eval(&mut runtime, "local a = window(\"win-1\") a.move:(10,20)");
    assert_eq!(out, "Moved window win-1 to (10, 20)");
    let record = runtime
        .state()
        .window(&WindowId::from("win-1"))
        .expect("record");
    assert_eq!((record.rect.x, record.rect.y), (10.0, 20.0));
}

#[test]
fn print_suppresses_window_calls_on_the_same_line() {
    let mut runtime = runtime();
    runtime.open_window("terminal", None);
    let before = runtime.state().clone();
    let out = eval(
        &mut runtime,
        "local a = window(\"win-1\") console.log:(\"hi\") a.move:(1,2)",
    );
    assert_eq!(out, "hi");
    assert_eq!(runtime.state(), &before);
}

#[test]
fn ls_on_missing_path_is_a_plain_line() {
    let mut runtime = runtime();
    assert_eq!(
        eval(&mut runtime, "ls /nonexistent"),
        "ls: /nonexistent: No such file or directory"
    );
}

#[test]
fn at_most_one_window_is_focused() {
    let mut runtime = runtime();
    let a = runtime.open_window("terminal", None).expect("a");
    let b = runtime.open_window("browser", None).expect("b");
    let c = runtime.open_window("terminal", None).expect("c");
    assert_eq!(focused_count(&runtime), 1);

    runtime.focus_window(&a);
    assert_eq!(focused_count(&runtime), 1);
    runtime.minimize_window(&a);
    assert_eq!(focused_count(&runtime), 0);
    runtime.focus_window(&b);
    runtime.close_window(&c);
    assert_eq!(focused_count(&runtime), 0);
    runtime.focus_window(&b);
    assert_eq!(runtime.state().focused_window_id(), Some(b));
}

#[test]
fn z_order_never_repeats_across_closes() {
    let mut runtime = runtime();
    let mut seen = Vec::new();
    for app in ["terminal", "browser", "terminal", "files"] {
        let id = runtime.open_window(app, None).expect("window");
        seen.push(runtime.state().window(&id).expect("record").z_index);
        runtime.close_window(&id);
    }
    let a = runtime.open_window("terminal", None).expect("window");
    runtime.focus_window(&a);
    seen.push(runtime.state().window(&a).expect("record").z_index);
    assert_eq!(seen, vec![100, 101, 102, 103, 105]);
}

#[test]
fn single_instance_app_opens_once() {
    let mut runtime = runtime();
    let first = runtime.open_window("vs-studio", None).expect("first");
    runtime.open_window("terminal", None);
    let second = runtime.open_window("vs-studio", None).expect("second");
    assert_eq!(first, second);
    let live = runtime
        .state()
        .windows
        .iter()
        .filter(|w| w.app_id == "vs-studio")
        .count();
    assert_eq!(live, 1);
    assert_eq!(runtime.state().focused_window_id(), Some(first));
}

#[test]
fn closed_window_ignores_ui_and_script_operations() {
    let mut runtime = runtime();
    let id = runtime.open_window("terminal", None).expect("window");
    runtime.close_window(&id);
    let before = runtime.state().clone();

    runtime.close_window(&id);
    runtime.focus_window(&id);
    runtime.minimize_window(&id);
    runtime.move_window(&id, 1.0, 1.0);
    runtime.resize_window(&id, 1.0, 1.0);
    runtime.toggle_taskbar_window(&id);
    assert_eq!(
        eval(&mut runtime, "local w = window(\"win-1\") w.focus:()"),
        "Error: Window variable 'w' not found"
    );
    assert_eq!(runtime.state(), &before);
}

#[test]
fn ui_and_script_paths_reach_the_same_state() {
    let mut via_ui = runtime();
    let mut via_script = runtime();
    for runtime in [&mut via_ui, &mut via_script] {
        runtime.open_window("terminal", None);
        runtime.open_window("browser", None);
    }
    let first = WindowId::from("win-1");

    via_ui.move_window(&first, 40.0, 60.0);
    via_ui.resize_window(&first, 500.0, 320.0);
    via_ui.focus_window(&first);

    let out = eval(
        &mut via_script,
        "var t = window('win-1') t.move:(40, 60) t.resize:(500, 320) t.focus:()",
    );
    assert_eq!(out.lines().count(), 3);

    let strip = |runtime: &DesktopRuntime| {
        let mut windows = runtime.state().windows.clone();
        for window in &mut windows {
            window.start_time_unix_ms = 0;
        }
        (windows, runtime.state().next_z_index)
    };
    assert_eq!(strip(&via_ui), strip(&via_script));
}

#[test]
fn binding_survives_close_within_a_line() {
    let mut runtime = runtime();
    runtime.open_window("terminal", None);
    let out = eval(
        &mut runtime,
        "local a = window(\"win-1\") a.close:() a.move:(5, 5)",
    );
    assert_eq!(out, "Closed window win-1\nMoved window win-1 to (5, 5)");
    assert!(runtime.state().windows.is_empty());
}

#[test]
fn windows_and_apps_builtins_reflect_state() {
    let mut runtime = runtime();
    runtime.open_window("browser", None);
    assert_eq!(
        eval(&mut runtime, "windows"),
        "win-1: Browser (100,50) 400x300 [open]"
    );
    let apps = eval(&mut runtime, "apps");
    assert_eq!(apps.lines().next(), Some("terminal: Terminal - Fluxo terminal with full scripting support"));
}

#[test]
fn file_builtins_share_the_runtime_tree() {
    let mut runtime = runtime();
    assert_eq!(eval(&mut runtime, "mkdir Projects"), "Created folder: Projects");
    assert_eq!(eval(&mut runtime, "touch todo.txt"), "Created file: todo.txt");
    assert_eq!(eval(&mut runtime, "ls Projects"), "(empty directory)");
    assert_eq!(eval(&mut runtime, "cat todo.txt"), "(empty file)");
    assert_eq!(
        eval(&mut runtime, "ls"),
        "📁 System\n📁 Documents\n📁 Projects\n📄 todo.txt"
    );

    let projects = runtime.fs().get_node_by_path("/Projects").expect("folder");
    let fs = runtime.fs_mut();
    let nested = fs
        .create_folder(Some(projects.id.as_str()), "src")
        .expect("nested folder");
    fs.create_file(Some(nested.id.as_str()), "main.fxo", "console.log:(1)")
        .expect("nested file");
    let removed = fs.delete_node(&projects.id).expect("delete");
    assert_eq!(removed.len(), 3);
    assert!(fs.get_node_by_path("/Projects/src/main.fxo").is_none());
}

#[test]
fn runtime_over_empty_tree() {
    let mut runtime = DesktopRuntime::with_fs(DesktopConfig::default(), MemoryVirtualFs::empty());
    assert_eq!(eval(&mut runtime, "ls /"), "(empty directory)");
}
