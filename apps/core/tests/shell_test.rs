use tcode_helper_core::command::Command;
use tcode_helper_core::model::{Entry, ScoredEntry};
use tcode_helper_core::shell::{parse_console_line, ConsoleShell, Shell};

#[test]
fn console_lines_map_to_commands() {
    assert_eq!(parse_console_line(":hide"), Command::RequestHide);
    assert_eq!(parse_console_line(":esc"), Command::RequestHide);
    assert_eq!(parse_console_line(":show"), Command::RequestShow);
    assert_eq!(parse_console_line(" :quit "), Command::RequestQuit);
    assert_eq!(parse_console_line(":about"), Command::About);
    assert_eq!(
        parse_console_line(":open se16"),
        Command::Select("se16".to_string())
    );
    assert_eq!(
        parse_console_line("display table"),
        Command::QueryChanged("display table".to_string())
    );
    assert_eq!(parse_console_line(""), Command::QueryChanged(String::new()));
}

#[test]
fn console_shell_prints_rows_and_detail() {
    let mut shell = ConsoleShell::new(Vec::new());
    let entry = Entry::new("SE16", "Data Browser", "display contents of table");

    shell.render_results(&[ScoredEntry {
        entry: entry.clone(),
        score: 4,
    }]);
    shell.render_detail(&entry, Some(4));
    shell.render_results(&[]);

    let out = String::from_utf8(shell.into_inner()).unwrap();
    assert!(out.contains("SE16         Data Browser\n"));
    assert!(out.contains("Keywords (4): display contents of table"));
    assert!(out.ends_with("(nessun risultato)\n"));
}

#[test]
fn console_shell_tracks_visibility() {
    let mut shell = ConsoleShell::new(Vec::new());
    assert!(shell.is_visible());

    shell.hide_window();
    assert!(!shell.is_visible());

    shell.show_window();
    shell.notify("in esecuzione");
    assert!(shell.is_visible());

    let out = String::from_utf8(shell.into_inner()).unwrap();
    assert_eq!(out, "[TCode Helper] in esecuzione\n");
}
