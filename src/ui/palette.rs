use ratatui::style::Color;

pub fn accuracy_color(accuracy: u8) -> Color {
    match accuracy {
        90.. => Color::Green,
        80..=89 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn wpm_color(wpm: u32) -> Color {
    match wpm {
        60.. => Color::Green,
        40..=59 => Color::Yellow,
        _ => Color::Red,
    }
}
