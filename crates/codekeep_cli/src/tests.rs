//! Unit tests for the `ck` CLI entrypoint module.

use super::{
    add_tag_args, confirm, format_list_output, format_show_output, format_summary_line,
    format_tags_output, read_code,
};
use super::{Cli, Commands};
use clap::Parser;
use codekeep_client::{Highlighter, SnippetForm};
use codekeep_core::models::snippet::{NewSnippet, Snippet};
use codekeep_core::ALL_TAGS;
use std::io::Cursor;

fn snippet(title: &str, tags: &[&str], favorite: bool) -> Snippet {
    let mut snippet = Snippet::new(NewSnippet {
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        description: Some("notes".to_string()),
        code: "def f(): pass\n".to_string(),
    });
    snippet.is_favorite = favorite;
    snippet
}

#[test]
fn cli_parses_list_filters() {
    let cli = Cli::try_parse_from(["ck", "list", "--search", "tree", "--tag", "go"])
        .expect("cli should parse list");
    match cli.command {
        Commands::List { search, tag } => {
            assert_eq!(search.as_deref(), Some("tree"));
            assert_eq!(tag, "go");
        }
        _ => panic!("expected list command"),
    }

    let cli = Cli::try_parse_from(["ck", "list"]).expect("cli should parse bare list");
    match cli.command {
        Commands::List { search, tag } => {
            assert!(search.is_none());
            assert_eq!(tag, ALL_TAGS);
        }
        _ => panic!("expected list command"),
    }
}

#[test]
fn cli_parses_repeated_tags_and_global_flags() {
    let cli = Cli::try_parse_from([
        "ck",
        "--server",
        "http://127.0.0.1:7000",
        "new",
        "--title",
        "Sort",
        "--tag",
        "python",
        "--tag",
        "dsa",
        "--json",
    ])
    .expect("cli should parse new");
    assert_eq!(cli.server, "http://127.0.0.1:7000");
    assert!(cli.json);
    match cli.command {
        Commands::New { title, tags, .. } => {
            assert_eq!(title, "Sort");
            assert_eq!(tags, vec!["python".to_string(), "dsa".to_string()]);
        }
        _ => panic!("expected new command"),
    }
}

#[test]
fn cli_rejects_clear_tags_with_tags() {
    let result = Cli::try_parse_from(["ck", "edit", "abc", "--tag", "x", "--clear-tags"]);
    assert!(result.is_err());

    let cli = Cli::try_parse_from(["ck", "delete", "abc", "--yes"]).expect("delete parses");
    match cli.command {
        Commands::Delete { id, yes } => {
            assert_eq!(id, "abc");
            assert!(yes);
        }
        _ => panic!("expected delete command"),
    }
}

#[test]
fn list_output_marks_favorites() {
    let fav = snippet("Flexbox", &["css", "react"], true);
    let plain = snippet("Sort", &["python"], false);
    let rendered = format_list_output(&[&fav, &plain], false).expect("table output");
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("* "));
    assert!(lines[0].contains(&fav.id));
    assert!(lines[0].ends_with("css, react"));
    assert!(lines[1].starts_with("  "));

    assert!(format_list_output(&[], false)
        .expect("empty output")
        .is_empty());
}

#[test]
fn json_outputs_keep_camel_case_payload() {
    let fav = snippet("Flexbox", &["css"], true);
    let rendered = format_list_output(&[&fav], true).expect("json list");
    let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
    assert_eq!(parsed[0]["title"], "Flexbox");
    assert_eq!(parsed[0]["isFavorite"], true);

    let rendered = format_summary_line("Created", &fav, true).expect("json summary");
    let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
    assert_eq!(parsed["id"], fav.id.as_str());

    let vocabulary = vec![ALL_TAGS.to_string(), "css".to_string()];
    let rendered = format_tags_output(&vocabulary, true).expect("json tags");
    let parsed: Vec<String> = serde_json::from_str(&rendered).expect("valid json");
    assert_eq!(parsed, vocabulary);
    assert_eq!(
        format_tags_output(&vocabulary, false).expect("tags"),
        "All\ncss"
    );
}

#[test]
fn summary_line_names_title_and_id() {
    let item = snippet("Sort", &[], false);
    assert_eq!(
        format_summary_line("Created", &item, false).expect("summary"),
        format!("Created: Sort ({})", item.id)
    );
}

#[test]
fn show_output_plain_and_highlighted() {
    let item = snippet("Sort", &["python"], true);
    let plain = format_show_output(&item, false, None).expect("plain show");
    assert!(plain.starts_with("Sort *\n"));
    assert!(plain.contains("tags: python\n"));
    assert!(plain.contains("notes\n"));
    assert!(plain.ends_with("def f(): pass\n"));

    let highlighter = Highlighter::default();
    let colored = format_show_output(&item, false, Some(&highlighter)).expect("highlighted");
    assert!(colored.contains("\x1b["));
    assert!(colored.starts_with("Sort *\n"));
}

#[test]
fn show_output_uses_placeholder_without_description() {
    let mut item = snippet("Sort", &[], false);
    item.description = None;
    let plain = format_show_output(&item, false, None).expect("plain show");
    assert_eq!(plain, "Sort\nNo description.\n\ndef f(): pass\n");
}

#[test]
fn confirm_accepts_only_yes_answers() {
    let cases = [
        ("y\n", true),
        ("YES\n", true),
        ("n\n", false),
        ("\n", false),
        ("", false),
        ("maybe\n", false),
    ];
    for (answer, expected) in cases {
        let mut input = Cursor::new(answer.as_bytes());
        let mut output = Vec::new();
        let accepted = confirm(&mut input, &mut output, "Delete?").expect("confirm");
        assert_eq!(accepted, expected, "answer {:?}", answer);
        assert_eq!(String::from_utf8(output).expect("utf8"), "Delete? [y/N] ");
    }
}

#[test]
fn tag_arguments_are_split_and_normalized() {
    let mut form = SnippetForm::new();
    add_tag_args(
        &mut form,
        &["Python".to_string(), "css, React".to_string(), "python".to_string()],
    );
    assert_eq!(form.tags(), ["python", "css", "react"]);
    assert!(form.tag_input().is_empty());
}

#[test]
fn read_code_reads_file_verbatim() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("snippet.py");
    std::fs::write(&path, "  def f(): pass\n").expect("write code");
    assert_eq!(
        read_code(Some(path.as_path())).expect("read code"),
        "  def f(): pass\n"
    );
    assert!(read_code(Some(dir.path().join("missing.py").as_path())).is_err());
}
