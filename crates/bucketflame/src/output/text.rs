//! Terminal rendering of per-category time breakdowns.

use crate::parser::{BucketRecord, Summary, ThreadSummary};
use colored::*;

/// Render the bucket report of every thread in a summary
///
/// Weights are converted to milliseconds with the summary's interval.
/// Categories are listed by descending top time; empty ones are omitted.
pub fn format_bucket_report(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str("\n🔥 ");
    out.push_str(&"Category Breakdown".bold().to_string());
    out.push('\n');
    if let Some(url) = &summary.url {
        out.push_str(&format!("URL: {}\n", url));
    }
    out.push_str(&format!("Interval: {} ms\n", summary.interval_ms));

    for thread in &summary.threads {
        out.push_str(&render_thread(thread, summary.interval_ms));
    }

    out
}

fn render_thread(thread: &ThreadSummary, interval_ms: f64) -> String {
    let mut out = String::new();
    out.push_str("---------------------------------------------------\n");
    out.push_str(&format!(
        "{} ({} samples, {:.1} ms)\n",
        thread.name.bold(),
        thread.sample_count,
        thread.duration_ms
    ));

    if let Some(error) = &thread.error {
        out.push_str(&format!("  {} {}\n", "error:".red().bold(), error));
        return out;
    }

    if thread.skipped_samples > 0 {
        out.push_str(&format!(
            "  skipped {} samples before navigation\n",
            thread.skipped_samples
        ));
    }

    out.push_str(&format!(
        "  {:<16} {:>12} {:>12} {:>8}\n",
        "category", "top ms", "tail ms", "share"
    ));

    let mut buckets: Vec<&BucketRecord> = thread
        .buckets
        .iter()
        .filter(|b| b.top_weight > 0 || b.tail_weight > 0)
        .collect();
    buckets.sort_by(|a, b| b.top_weight.cmp(&a.top_weight));

    for bucket in buckets {
        let share = share_percent(bucket.top_weight, thread.total_weight);
        let line = format!(
            "  {:<16} {:>12.1} {:>12.1} {:>7.1}%",
            bucket.category,
            bucket.top_weight as f64 * interval_ms,
            bucket.tail_weight as f64 * interval_ms,
            share
        );
        if share >= 25.0 {
            out.push_str(&line.yellow().to_string());
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }

    out
}

fn share_percent(weight: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        weight as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(threads: Vec<ThreadSummary>) -> Summary {
        Summary {
            version: "1.0.0".to_string(),
            url: None,
            interval_ms: 2.0,
            categories: vec!["*".to_string(), "js".to_string(), "gc".to_string()],
            threads,
            generated_at: String::new(),
        }
    }

    fn bucket(category: &str, top: u64, tail: u64) -> BucketRecord {
        BucketRecord {
            category: category.to_string(),
            top_weight: top,
            tail_weight: tail,
        }
    }

    #[test]
    fn test_report_lists_categories_by_top_time() {
        colored::control::set_override(false);
        let report = format_bucket_report(&summary(vec![ThreadSummary {
            name: "GeckoMain".to_string(),
            total_weight: 10,
            buckets: vec![bucket("*", 1, 9), bucket("js", 9, 0), bucket("gc", 0, 0)],
            ..Default::default()
        }]));

        let js = report.find("js ").unwrap();
        let star = report.find("* ").unwrap();
        assert!(js < star);
        assert!(report.contains("18.0"));
        assert!(report.contains("90.0%"));
        assert!(!report.contains("gc"));
    }

    #[test]
    fn test_report_shows_thread_error() {
        colored::control::set_override(false);
        let report = format_bucket_report(&summary(vec![ThreadSummary {
            name: "Broken".to_string(),
            error: Some("cycle".to_string()),
            ..Default::default()
        }]));
        assert!(report.contains("error: cycle"));
    }

    #[test]
    fn test_share_of_empty_thread() {
        assert_eq!(share_percent(0, 0), 0.0);
        assert_eq!(share_percent(1, 4), 25.0);
    }
}
