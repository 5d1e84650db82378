//! Text for live recommendations.

use crate::provider::{RawDetail, RawItem};
use crate::recommendation::{Category, RunContext, TimeOfDay};

/// Subject line for a finished recommendation.
pub fn subject(category: Category, name: &str) -> String {
    let kind = match category {
        Category::Restaurant => "Restaurant",
        Category::PointOfInterest => "Place to visit",
        Category::Movie => "Movie night",
    };
    format!("{kind} idea: {name}")
}

/// Render a live item, using enrichment when it is available.
pub fn render_live(category: Category, item: &RawItem, detail: Option<&RawDetail>, ctx: &RunContext) -> String {
    let mut lines = vec![format!("**{}**", item.name.trim())];

    if let Some(address) = item.address.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.push(address.trim().to_string());
    }
    if let Some(rating) = item.rating {
        let scale = if category == Category::Movie { 10 } else { 5 };
        lines.push(format!("Rating: {rating:.1}/{scale}"));
    }

    let description = detail
        .and_then(|d| d.description.as_deref())
        .or(item.summary.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty());
    if let Some(description) = description {
        lines.push(String::new());
        lines.push(description.to_string());
    }

    if let Some(detail) = detail {
        if !detail.highlights.is_empty() {
            lines.push(String::new());
            lines.extend(detail.highlights.iter().map(|h| format!("- {}", h.trim())));
        }
    }

    lines.push(String::new());
    lines.push(context_line(category, ctx));

    if let Some(url) = detail.and_then(|d| d.url.as_deref()).or(item.url.as_deref()) {
        lines.push(String::new());
        lines.push(url.to_string());
    }

    lines.join("\n")
}

fn context_line(category: Category, ctx: &RunContext) -> String {
    match (category, ctx.time_of_day) {
        (Category::Movie, TimeOfDay::Evening) => "Perfect for tonight's movie night.".to_string(),
        (Category::Movie, _) => "Save this one for your next movie night.".to_string(),
        (_, TimeOfDay::LateNight) => format!("Something to plan for this {}.", ctx.season),
        _ => format!("A good pick for a {} {}.", ctx.season, ctx.time_of_day),
    }
}
