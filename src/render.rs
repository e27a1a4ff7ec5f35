//! Purpose: Render contact list and detail views for human CLI output.
//! Exports: `list_line`, `detail_block`, `NO_EMAIL`, `NO_PHONE`.
//! Role: Small, pure formatter used by CLI emission paths.
//! Invariants: When color is disabled, output contains no ANSI escapes.
//! Invariants: Placeholders stand in for tolerated absences; fields are never dropped.

use rolodex::api::Contact;

pub const NO_EMAIL: &str = "(no email)";
pub const NO_PHONE: &str = "(no phone)";

// Conservative 8/16-color palette for broad terminal compatibility.
const COLOR_LABEL: &str = "36";
const COLOR_PLACEHOLDER: &str = "33";

pub fn list_line(position: usize, contact: &Contact, use_color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{position:>4}  {}  ", contact.full_name()));
    match contact.primary_email() {
        Some(email) => out.push_str(&format!("<{email}>")),
        None => push_colored(NO_EMAIL, COLOR_PLACEHOLDER, use_color, &mut out),
    }
    out
}

pub fn detail_block(contact: &Contact, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(field_line("name:", &contact.full_name(), use_color));
    if contact.emails.is_empty() {
        lines.push(placeholder_line("email:", NO_EMAIL, use_color));
    } else {
        for email in &contact.emails {
            lines.push(field_line("email:", email, use_color));
        }
    }
    match &contact.phone {
        Some(phone) => lines.push(field_line("phone:", phone, use_color)),
        None => lines.push(placeholder_line("phone:", NO_PHONE, use_color)),
    }
    lines.join("\n")
}

fn field_line(label: &str, value: &str, use_color: bool) -> String {
    let mut out = String::new();
    push_colored(label, COLOR_LABEL, use_color, &mut out);
    out.push_str(&" ".repeat(7_usize.saturating_sub(label.len())));
    out.push_str(value);
    out
}

fn placeholder_line(label: &str, placeholder: &str, use_color: bool) -> String {
    let mut out = String::new();
    push_colored(label, COLOR_LABEL, use_color, &mut out);
    out.push_str(&" ".repeat(7_usize.saturating_sub(label.len())));
    push_colored(placeholder, COLOR_PLACEHOLDER, use_color, &mut out);
    out
}

fn push_colored(text: &str, color: &str, use_color: bool, out: &mut String) {
    if !use_color {
        out.push_str(text);
        return;
    }
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    out.push_str(text);
    out.push_str("\u{1b}[0m");
}
