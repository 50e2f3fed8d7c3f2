use crate::picker::PickerStatus;
use crate::records::OrderStatus;
use ratatui::style::{Color, Modifier, Style};

pub const BAR_BG: Color = Color::Rgb(0, 95, 135);
pub const ROW_ALT_BG: Color = Color::Rgb(25, 25, 35);
pub const ROW_HIGHLIGHT_BG: Color = Color::Rgb(60, 60, 80);

pub fn status_style(status: &PickerStatus) -> Style {
    match status {
        PickerStatus::Error(_) => Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        PickerStatus::Loading => Style::default().fg(Color::Yellow),
        PickerStatus::TypeMore { .. } | PickerStatus::Idle => {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
        }
        PickerStatus::NoMatches => Style::default().fg(Color::Gray),
        PickerStatus::Results(_) => Style::default().fg(Color::Green),
    }
}

pub fn status_text(status: &PickerStatus) -> String {
    match status {
        PickerStatus::Idle => String::new(),
        PickerStatus::TypeMore { min_len } => {
            format!("Type at least {} characters to search", min_len)
        }
        PickerStatus::Loading => "\u{23F3} Searching...".to_string(),
        PickerStatus::Error(msg) => format!("\u{26A0} {}  (Ctrl+R to retry)", msg),
        PickerStatus::NoMatches => "No matches".to_string(),
        PickerStatus::Results(n) if *n == 1 => "1 result".to_string(),
        PickerStatus::Results(n) => format!("{} results", n),
    }
}

pub fn order_status_color(status: OrderStatus) -> Color {
    match status {
        OrderStatus::Paid => Color::Green,
        OrderStatus::Pending => Color::Yellow,
        OrderStatus::Cancelled => Color::DarkGray,
    }
}

pub fn icon_for_kind(kind: &str) -> &'static str {
    match kind {
        "client" => "\u{1F464}",   // bust in silhouette
        "order" => "\u{1F9FE}",    // receipt
        "resource" => "\u{1F3E5}", // hospital
        _ => "\u{1F4C4}",          // page
    }
}
