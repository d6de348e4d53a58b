//! SimTalk command text helpers
//!
//! Block commands are easier to read when written as indented multi-line
//! string literals. [`normalize`] removes the indentation they pick up from
//! the surrounding Rust source before the text is sent to the engine.

/// Tab stops used when expanding tabs in command text
const TAB_WIDTH: usize = 8;

/// Normalize multi-line command text
///
/// - tabs are expanded to spaces
/// - leading whitespace of the first line is removed
/// - the indentation shared by all following non-blank lines is removed
/// - leading and trailing blank lines are dropped
///
/// ```rust
/// use plantsim_remote::session::command::normalize;
///
/// let text = "
///     var t: table
///     t.create
/// ";
/// assert_eq!(normalize(text), "var t: table\nt.create");
/// ```
pub fn normalize(text: &str) -> String {
    let lines: Vec<String> = text.lines().map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min();

    let mut cleaned: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                return line.trim_start().to_string();
            }
            match margin {
                Some(margin) => line.get(margin..).unwrap_or_else(|| line.trim_start()).to_string(),
                None => line.trim_start().to_string(),
            }
        })
        .collect();

    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }
    let leading_blank = cleaned.iter().take_while(|line| line.trim().is_empty()).count();
    cleaned.drain(..leading_blank);

    cleaned.join("\n")
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }

    let mut expanded = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = TAB_WIDTH - column % TAB_WIDTH;
            expanded.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded
}

/// Quote a file path or sheet name as a SimTalk string literal
pub fn quote(text: &str) -> String {
    format!("\"{}\"", text)
}
