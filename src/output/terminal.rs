// Colored terminal output for comparisons and taste profiles.
//
// main.rs delegates all human-readable rendering here; `--json` output
// bypasses this module entirely.

use colored::Colorize;

use crate::models::{ComparisonResult, TasteProfile};

use super::{percent, truncate_chars};

/// How many shared items to list per section.
const LIST_LIMIT: usize = 10;

/// Display a full comparison.
pub fn display_comparison(result: &ComparisonResult) {
    println!(
        "\n{}",
        format!(
            "=== {} vs {} ===",
            result.user1.display_name, result.user2.display_name
        )
        .bold()
    );
    println!(
        "\n  Similarity: {}",
        colorize_score(result.similarity_score)
    );

    if !result.recommendations.is_empty() {
        println!();
        for line in &result.recommendations {
            println!("  {} {}", "*".cyan(), line);
        }
    }

    println!(
        "\n{}",
        format!("Shared artists ({})", result.shared_artists.len()).bold()
    );
    if result.shared_artists.is_empty() {
        println!("  {}", "No shared artists found".dimmed());
    }
    for (i, artist) in result.shared_artists.iter().take(LIST_LIMIT).enumerate() {
        println!(
            "  {:>2}. {:<32} {}",
            i + 1,
            truncate_chars(&artist.name, 30),
            format!("popularity {}", artist.popularity).dimmed()
        );
    }

    println!(
        "\n{}",
        format!("Shared tracks ({})", result.shared_tracks.len()).bold()
    );
    if result.shared_tracks.is_empty() {
        println!("  {}", "No shared tracks found".dimmed());
    }
    for (i, track) in result.shared_tracks.iter().take(LIST_LIMIT).enumerate() {
        println!(
            "  {:>2}. {:<32} {}",
            i + 1,
            truncate_chars(&track.name, 30),
            track.primary_artist().unwrap_or("").dimmed()
        );
    }

    println!(
        "\n{}",
        format!("Shared genres ({})", result.shared_genres.len()).bold()
    );
    if result.shared_genres.is_empty() {
        println!("  {}", "No shared genres found".dimmed());
    } else {
        let genres: Vec<&str> = result
            .shared_genres
            .iter()
            .take(15)
            .map(String::as_str)
            .collect();
        println!("  {}", genres.join(", "));
    }

    println!("\n{}", "Audio features".bold());
    println!(
        "  {:<18} {:>8} {:>8} {:>9}",
        "Feature".dimmed(),
        truncate_chars(&result.user1.display_name, 8).dimmed(),
        truncate_chars(&result.user2.display_name, 8).dimmed(),
        "Similar".dimmed()
    );
    println!("  {}", "-".repeat(46).dimmed());
    for (feature, comparison) in &result.audio_features_comparison {
        println!(
            "  {:<18} {:>8} {:>8} {:>9}",
            feature.as_str(),
            percent(comparison.user1),
            percent(comparison.user2),
            percent(comparison.similarity)
        );
    }
    println!();
}

/// Display one user's taste profile.
pub fn display_profile(profile: &TasteProfile) {
    println!(
        "\n{}",
        format!("=== Taste profile: {} ===", profile.profile.display_name).bold()
    );

    println!("\n{}", format!("Top artists ({})", profile.top_artists.len()).bold());
    for (i, artist) in profile.top_artists.iter().take(LIST_LIMIT).enumerate() {
        println!("  {:>2}. {}", i + 1, artist.name);
    }

    println!("\n{}", format!("Top tracks ({})", profile.top_tracks.len()).bold());
    for (i, track) in profile.top_tracks.iter().take(LIST_LIMIT).enumerate() {
        println!(
            "  {:>2}. {:<32} {}",
            i + 1,
            truncate_chars(&track.name, 30),
            track.primary_artist().unwrap_or("").dimmed()
        );
    }

    if !profile.genres.is_empty() {
        let genres: Vec<&str> = profile.genres.iter().take(15).map(String::as_str).collect();
        println!("\n{}", "Genres".bold());
        println!("  {}", genres.join(", "));
    }

    println!("\n{}", "Audio features".bold());
    for (feature, value) in profile.audio_features.iter() {
        let bar = "#".repeat((value * 20.0).round() as usize);
        println!("  {:<18} {:>5}  {}", feature.as_str(), percent(value), bar.green());
    }
    println!();
}

/// Colorize a similarity score by compatibility band.
fn colorize_score(score: u8) -> colored::ColoredString {
    let text = format!("{score}%");
    match score {
        70..=100 => text.green().bold(),
        40..=69 => text.yellow(),
        _ => text.red(),
    }
}
