use nhealth_api::{Category, MeasureResponse};
use std::fmt::Write;

/// Human-readable listing of a measurement response.
pub fn render(response: &MeasureResponse) -> String {
    let mut out = String::new();

    if let Some(update_time) = response.update_time {
        let _ = writeln!(
            out,
            "Updated {} ({})",
            update_time.format("%Y-%m-%d %H:%M:%S UTC"),
            response.timezone
        );
    }

    if response.measure_groups.is_empty() {
        out.push_str("No measurements in range\n");
        return out;
    }

    for group in &response.measure_groups {
        let _ = writeln!(
            out,
            "{} [{} group {}]",
            group.date.format("%Y-%m-%d %H:%M:%S"),
            category_name(group.category),
            group.group_id
        );
        for measure in &group.measures {
            let _ = writeln!(out, "  {}: {:.2}", measure.measure_type, measure.scaled_value());
        }
    }

    if response.has_more() {
        let _ = writeln!(out, "More measurements available from offset {}", response.offset);
    }

    out
}

fn category_name(category: Category) -> String {
    match category {
        Category::Real => "measured".to_string(),
        Category::Goal => "objective".to_string(),
        Category::Other(code) => format!("category {}", code),
    }
}
