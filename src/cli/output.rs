//! Report rendering for the terminal and JSON
//!
//! Text output uses `console` styling (colors drop out automatically when
//! stdout is not a terminal); JSON is the serialized engine result.

use anyhow::{anyhow, Context, Result};
use console::style;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

use teampulse::network::{
    CentralityReport, CommunityPartition, NetworkSummary, RankedMember, TeamGraph,
};
use teampulse::scoring::Rating;
use teampulse::{MemberId, TeamReport, ThreeEsReport};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

fn json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn rating_style(rating: Rating, text: String) -> String {
    let styled = style(text).bold();
    let styled = match rating {
        Rating::Excellent => styled.green(),
        Rating::Good => styled.green().bright(),
        Rating::Fair => styled.yellow(),
        Rating::NeedsImprovement => styled.red().bright(),
        Rating::Poor => styled.red(),
    };
    styled.to_string()
}

fn header(out: &mut String, title: &str) {
    out.push_str(&format!("\n{}\n", style(title).bold()));
    out.push_str(&format!("{}\n", style("──────────────────────────────────────").dim()));
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n{}\n", style(title).bold()));
}

fn member_list(ids: &[MemberId], graph: Option<&TeamGraph>) -> String {
    if ids.is_empty() {
        return style("none").dim().to_string();
    }
    ids.iter()
        .map(|id| match graph.and_then(|g| g.member_name(*id)) {
            Some(name) => format!("{name} ({id})"),
            None => id.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn ranked_list(ranked: &[RankedMember]) -> String {
    if ranked.is_empty() {
        return style("none").dim().to_string();
    }
    ranked
        .iter()
        .map(|m| format!("{} ({:.3})", m.name, m.score))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// THREE E'S
// ============================================================================

fn write_three_es(out: &mut String, report: &ThreeEsReport) {
    let overall = &report.overall;
    out.push_str(&format!(
        "Overall: {}  {}\n",
        rating_style(overall.rating, format!("{:.1}/100", overall.overall_score)),
        rating_style(overall.rating, overall.rating.to_string())
    ));
    out.push_str(&format!(
        "{}\n",
        style(format!("Window: {} to {}", report.window.start, report.window.end)).dim()
    ));

    section(out, "SCORES");
    let rows = [
        ("Energy", report.energy.energy_score, report.ratings.energy),
        ("Engagement", report.engagement.engagement_score, report.ratings.engagement),
        ("Exploration", report.exploration.exploration_score, report.ratings.exploration),
    ];
    for (name, score, rating) in rows {
        out.push_str(&format!(
            "  {:<12} {}  {}\n",
            name,
            rating_style(rating, format!("{:>5.1}", score)),
            rating
        ));
    }

    section(out, "DETAILS");
    let e = &report.energy;
    out.push_str(&format!(
        "  {} communications, {:.1} per member, {:.0} minutes, {:.0}% face-to-face\n",
        e.total_communications,
        e.avg_communications_per_member,
        e.total_duration_minutes,
        e.face_to_face_ratio * 100.0
    ));
    let g = &report.engagement;
    out.push_str(&format!(
        "  {}/{} members active, Gini {:.2}, two-way {:.0}%\n",
        g.active_members,
        g.member_count,
        g.gini_coefficient,
        g.two_way_communication_score * 100.0
    ));
    let x = &report.exploration;
    out.push_str(&format!(
        "  {} cross-team communications ({:.0}%), {} external teams, {} members exploring\n",
        x.cross_team_communications,
        x.exploration_ratio * 100.0,
        x.external_teams_contacted,
        x.members_exploring
    ));

    section(out, "RECOMMENDATIONS");
    for rec in &report.recommendations {
        out.push_str(&format!("  {} {}\n", style("•").cyan(), rec));
    }
}

pub fn render_three_es(report: &ThreeEsReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(report),
        OutputFormat::Text => {
            let mut out = String::new();
            header(&mut out, "Team Three E's");
            write_three_es(&mut out, report);
            Ok(out)
        }
    }
}

// ============================================================================
// NETWORK
// ============================================================================

fn write_network(out: &mut String, summary: &NetworkSummary, graph: Option<&TeamGraph>) {
    let connected = if summary.is_connected {
        style("connected".to_string()).green()
    } else {
        style(format!("{} components", summary.component_count)).yellow()
    };
    out.push_str(&format!(
        "Members: {}  Links: {}  Density: {:.3}  {}\n",
        summary.num_nodes, summary.num_edges, summary.density, connected
    ));
    out.push_str(&format!(
        "Avg degree: {:.2}  Avg betweenness: {:.3}\n",
        summary.avg_degree, summary.avg_betweenness
    ));

    match summary.most_central_member_id {
        Some(id) => {
            out.push_str(&format!(
                "Most central: {} (degree {:.3})\n",
                member_list(&[id], graph),
                summary.centrality_score
            ));
        }
        None => {
            out.push_str(&format!("Most central: {}\n", style("none").dim()));
        }
    }

    let bottleneck_label = if summary.potential_bottlenecks.is_empty() {
        style("Bottlenecks:").bold()
    } else {
        style("Bottlenecks:").bold().red()
    };
    out.push_str(&format!(
        "{} {}\n",
        bottleneck_label,
        member_list(&summary.potential_bottlenecks, graph)
    ));
    if !summary.isolated_member_ids.is_empty() {
        out.push_str(&format!(
            "{} {}\n",
            style("Isolated:").bold().yellow(),
            member_list(&summary.isolated_member_ids, graph)
        ));
    }
}

pub fn render_network(
    summary: &NetworkSummary,
    graph: &TeamGraph,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => json(summary),
        OutputFormat::Text => {
            let mut out = String::new();
            header(&mut out, "Communication Network");
            write_network(&mut out, summary, Some(graph));
            Ok(out)
        }
    }
}

// ============================================================================
// CENTRALITY
// ============================================================================

fn write_centrality(out: &mut String, report: &CentralityReport) {
    out.push_str(&format!(
        "{}\n",
        style(format!(
            "  {:<20} {:>8} {:>11} {:>9} {:>11}",
            "MEMBER", "DEGREE", "BETWEENNESS", "CLOSENESS", "EIGENVECTOR"
        ))
        .dim()
    ));
    for m in &report.members {
        let name: String = m.name.chars().take(20).collect();
        let closeness = m
            .closeness
            .map(|c| format!("{c:.3}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<20} {:>8.3} {:>11.3} {:>9} {:>11.3}\n",
            name, m.degree, m.betweenness, closeness, m.eigenvector
        ));
    }

    section(out, "KEY ROLES");
    let roles = &report.key_roles;
    out.push_str(&format!("  Connectors:  {}\n", ranked_list(&roles.connectors)));
    out.push_str(&format!("  Influencers: {}\n", ranked_list(&roles.influencers)));
    out.push_str(&format!("  Hubs:        {}\n", ranked_list(&roles.hubs)));

    section(out, "INSIGHTS");
    for insight in &report.insights {
        out.push_str(&format!("  {} {}\n", style("•").cyan(), insight));
    }
}

pub fn render_centrality(report: &CentralityReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(report),
        OutputFormat::Text => {
            let mut out = String::new();
            header(&mut out, "Member Centrality");
            write_centrality(&mut out, report);
            Ok(out)
        }
    }
}

// ============================================================================
// COMMUNITIES
// ============================================================================

fn write_communities(out: &mut String, partition: &CommunityPartition) {
    let modularity = if partition.is_siloed {
        style(format!("{:.3} (siloed)", partition.modularity)).red().bold()
    } else {
        style(format!("{:.3}", partition.modularity)).green()
    };
    out.push_str(&format!(
        "Communities: {}  Modularity: {}\n",
        partition.num_communities, modularity
    ));
    out.push_str(&format!("{}\n", partition.interpretation));

    for community in &partition.communities {
        out.push_str(&format!(
            "  {} {} ({} members): {}\n",
            style("#").dim(),
            community.community_id,
            community.size,
            community.member_names.join(", ")
        ));
    }
}

pub fn render_communities(partition: &CommunityPartition, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(partition),
        OutputFormat::Text => {
            let mut out = String::new();
            header(&mut out, "Communities");
            write_communities(&mut out, partition);
            Ok(out)
        }
    }
}

// ============================================================================
// FULL REPORT
// ============================================================================

pub fn render_report(report: &TeamReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json(report),
        OutputFormat::Text => {
            let mut out = String::new();
            let title = match report.team_id {
                Some(team) => format!("TeamPulse Report: team {team}"),
                None => "TeamPulse Report".to_string(),
            };
            header(&mut out, &title);
            write_three_es(&mut out, &report.three_es);
            header(&mut out, "Communication Network");
            write_network(&mut out, &report.network, None);
            header(&mut out, "Member Centrality");
            write_centrality(&mut out, &report.centrality);
            header(&mut out, "Communities");
            write_communities(&mut out, &report.communities);
            Ok(out)
        }
    }
}

/// Print to stdout or write to a file
pub fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_three_es_text_layout() {
        use chrono::{TimeZone, Utc};
        use teampulse::{compute_three_es, EngineConfig, Member, ScoringWindow};

        let members = vec![Member::new(1, "Ada", 7), Member::new(2, "Grace", 7)];
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let window = ScoringWindow::last_days(start + chrono::Duration::days(7), 7).unwrap();
        let report = compute_three_es(&members, &[], window, &EngineConfig::default()).unwrap();

        let text = render_three_es(&report, OutputFormat::Text).unwrap();
        assert!(text.starts_with('\n'));
        assert!(text.ends_with('\n'));
        assert!(text.contains("Team Three E's\n"));
        assert!(text.contains("\nSCORES\n"));
        assert!(text.contains("  0 communications"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("Exploration")));
    }

    #[test]
    fn test_member_list_without_graph() {
        assert_eq!(member_list(&[3, 1], None), "3, 1");
    }

    #[test]
    fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        emit("{}", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
