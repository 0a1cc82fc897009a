use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";

pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(len).with_message(message.to_string());

    // Falls back to the default style on a bad template
    if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
        bar.set_style(style.progress_chars("##-"));
    }

    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_length_and_message() {
        let bar = progress_bar(12, "Advancing weeks");

        assert_eq!(bar.length(), Some(12));
        assert_eq!(bar.message(), "Advancing weeks");

        bar.inc(3);
        assert_eq!(bar.position(), 3);
    }
}
