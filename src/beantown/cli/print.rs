use beantown::api::{CacheStatus, CmdMessage, MessageLevel};
use beantown::config::{BeanTownConfig, CONFIG_KEYS};
use beantown::model::JellyBean;
use beantown::paging::freshness::InitializeAction;
use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 6;
const TAGS_WIDTH: usize = 12;
const SWATCH: &str = "●";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_beans(beans: &[JellyBean]) {
    for bean in beans {
        let idx_str = format!("{:>width$}. ", bean.bean_id, width = ID_WIDTH - 2);
        let tags = bean.dietary_tags().join(" ");

        // swatch + space
        let fixed_width = idx_str.width() + 2 + TAGS_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title = format!("{} {}", bean.flavor_name, bean.description.replace('\n', " "));
        let title_display = truncate_to_width(&title, available);
        let padding = available.saturating_sub(title_display.width());

        println!(
            "{}{} {}{}{}",
            idx_str.dimmed(),
            swatch(bean.background_color),
            title_display,
            " ".repeat(padding),
            format!("{:>width$}", tags, width = TAGS_WIDTH).cyan()
        );
    }
}

pub(super) fn print_bean(bean: &JellyBean) {
    println!(
        "{} {} {}",
        swatch(bean.background_color),
        bean.flavor_name.bold(),
        format!("#{}", bean.bean_id).dimmed()
    );
    println!("--------------------------------");
    println!("{}", bean.description);
    println!();
    print_field("Groups", &bean.group_name.join(", "));
    print_field("Ingredients", &bean.ingredients.join(", "));
    print_field("Color group", &bean.color_group);
    print_field("Background", &bean.background_hex());
    print_field("Dietary", &bean.dietary_tags().join(" "));
    print_field("Image", &bean.image_url);
    print_field("Page", &bean.page.to_string());
}

pub(super) fn print_status(status: &CacheStatus) {
    print_field("Cached beans", &status.bean_count.to_string());
    let pages = match status.pages.as_slice() {
        [] => "none".to_string(),
        [only] => only.to_string(),
        [first, .., last] => format!("{}-{} ({} keys)", first, last, status.pages.len()),
    };
    print_field("Pages", &pages);
    print_field(
        "More pages",
        if status.more_pages { "yes" } else { "no" },
    );
    let refreshed = status
        .last_refreshed
        .map(format_time_ago)
        .unwrap_or_else(|| "never".to_string());
    print_field("Last refreshed", &refreshed);
    print_field(
        "Cache timeout",
        &format!("{}s", status.cache_timeout.as_secs()),
    );
    let next = match status.next_action {
        InitializeAction::SkipInitialRefresh => "serve cache".green(),
        InitializeAction::LaunchInitialRefresh => "refresh first".yellow(),
    };
    println!("{}{}", format!("{:<16}", "Next session:").dimmed(), next);
}

pub(super) fn print_config(config: &BeanTownConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn print_field(label: &str, value: &str) {
    let label = format!("{}:", label);
    println!("{}{}", format!("{:<16}", label).dimmed(), value);
}

fn swatch(argb: u32) -> colored::ColoredString {
    if argb >> 24 == 0 {
        return SWATCH.dimmed();
    }
    let [_, r, g, b] = argb.to_be_bytes();
    SWATCH.truecolor(r, g, b)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_to_width("Very Cherry", 20), "Very Cherry");
    }

    #[test]
    fn truncate_marks_cut() {
        let cut = truncate_to_width("Buttered Popcorn", 8);
        assert_eq!(cut, "Buttere…");
        assert!(cut.width() <= 8);
    }

    #[test]
    fn truncate_counts_wide_chars() {
        let cut = truncate_to_width("ゼリービーンズ", 6);
        assert_eq!(cut, "ゼリ…");
    }

    #[test]
    fn time_ago_is_relative() {
        let ago = format_time_ago(Utc::now() - chrono::Duration::minutes(5));
        assert!(ago.ends_with("ago"), "{}", ago);
    }
}
