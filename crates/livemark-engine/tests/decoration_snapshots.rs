use livemark_engine::resolve::invariants;
use livemark_engine::{
    MarkdownTreeProvider, Mode, NodeTreeProvider, RebuildInput, build_decorations,
};

const NOTE: &str = "# Title\n\nSome **bold** and [[Note#Part|shown]].\n\n> quote\n\n- item\n";

fn dump(text: &str, caret: usize, mode: Mode) -> String {
    let tree = MarkdownTreeProvider::new().parse(text);
    let set = build_decorations(&RebuildInput::whole(text, &tree, caret, mode));
    invariants::check(&set);
    set.dump(text).trim_end().to_string()
}

#[test]
fn edit_mode_caret_on_heading_line() {
    insta::assert_snapshot!(dump(NOTE, 0, Mode::Edit), @r##"
    style 2..7 cm-h1 "Title"
    hide 14..16 "**"
    style 16..20 cm-strong "bold"
    hide 20..22 "**"
    widget 27..46 edit-link [[Note#Part|shown]] "[[Note#Part|shown]]"
    "##);
}

#[test]
fn edit_mode_caret_inside_bold() {
    insta::assert_snapshot!(dump(NOTE, 17, Mode::Edit), @r##"
    hide 0..2 "# "
    style 2..7 cm-h1 "Title"
    widget 27..46 edit-link [[Note#Part|shown]] "[[Note#Part|shown]]"
    "##);
}

#[test]
fn edit_mode_caret_inside_link() {
    insta::assert_snapshot!(dump(NOTE, 30, Mode::Edit), @r##"
    hide 0..2 "# "
    style 2..7 cm-h1 "Title"
    hide 14..16 "**"
    style 16..20 cm-strong "bold"
    hide 20..22 "**"
    "##);
}

#[test]
fn preview_mode_hides_everything() {
    insta::assert_snapshot!(dump(NOTE, 17, Mode::Preview), @r##"
    hide 0..2 "# "
    style 2..7 cm-h1 "Title"
    hide 14..16 "**"
    style 16..20 cm-strong "bold"
    hide 20..22 "**"
    widget 27..46 preview-link [[Note#Part|shown]] "[[Note#Part|shown]]"
    style 49..56 cm-blockquote "> quote"
    hide 49..50 ">"
    style 58..64 cm-list-item "- item"
    hide 58..59 "-"
    "##);
}

#[test]
fn preview_code_and_rule() {
    let text = "Use `x`.\n\n---\n\n```sh\nls\n```\n";
    insta::assert_snapshot!(dump(text, 0, Mode::Preview), @r##"
    style 4..7 cm-inline-code "`x`"
    hide 4..5 "`"
    hide 6..7 "`"
    widget 10..13 hr "---"
    style 15..27 cm-code-block "```sh\nls\n```"
    hide 15..18 "```"
    hide 24..27 "```"
    "##);
}
