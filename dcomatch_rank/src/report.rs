use crate::model::{ArticleScan, RankReport, SimilarityMatch};

/// Format a markdown-oriented human report from a ranking pass.
pub fn format_markdown_report(report: &RankReport, source_label: &str) -> String {
    let mut out = String::new();
    out.push_str("# Similar Articles Report\n\n");
    out.push_str(&format!("- Source: `{source_label}`\n"));
    out.push_str(&format!(
        "- Words: {} (candidate band {}..={})\n\n",
        report.word_count, report.band.min, report.band.max
    ));

    let stats = &report.stats;
    out.push_str("## Stats\n\n");
    out.push_str(&format!("- Candidates: {}\n", stats.fetched));
    out.push_str(&format!(
        "- Compared: {} ({} exact, {} failed)\n",
        stats.compared, stats.exact_matches, stats.comparison_failures
    ));
    out.push_str(&format!(
        "- Skipped: {} (band {}, category {}, length {}, overlap {}, threshold {}, same order {})\n",
        stats.skipped.total(),
        stats.skipped.outside_word_band,
        stats.skipped.category_mismatch,
        stats.skipped.length_ratio,
        stats.skipped.word_overlap,
        stats.skipped.below_threshold,
        stats.skipped.same_order,
    ));
    if stats.not_evaluated > 0 {
        out.push_str(&format!(
            "- Not evaluated (time budget): {}\n",
            stats.not_evaluated
        ));
    }

    out.push_str("\n## Matches\n\n");
    push_matches(&mut out, &report.matches);
    out
}

/// Format a markdown report for a whole-order scan.
pub fn format_scan_report(scans: &[ArticleScan], order_id: i64) -> String {
    let mut out = String::new();
    out.push_str("# Order Scan Report\n\n");
    out.push_str(&format!("- Order: {order_id}\n"));
    out.push_str(&format!("- Articles: {}\n", scans.len()));
    out.push_str(&format!(
        "- Novel: {}\n",
        scans.iter().filter(|s| s.novel).count()
    ));

    for scan in scans {
        out.push_str(&format!(
            "\n## Article {}: {}\n\n",
            scan.article_number, scan.article_title
        ));
        if scan.novel {
            out.push_str("Novel: no similar article in other orders.\n");
        } else {
            push_matches(&mut out, &scan.matches);
        }
    }
    out
}

fn push_matches(out: &mut String, matches: &[SimilarityMatch]) {
    if matches.is_empty() {
        out.push_str("No similar articles found.\n");
        return;
    }
    for (idx, m) in matches.iter().enumerate() {
        out.push_str(&format!(
            "{}. {:.1}% {} article {} ({}){}\n",
            idx + 1,
            m.similarity,
            m.order_name,
            m.article_number,
            m.article_title,
            if m.reordered { " [reordered]" } else { "" },
        ));
    }
}
