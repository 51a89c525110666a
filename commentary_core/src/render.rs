//! Compact rendering of a context for token-limited prompts.
//!
//! Sections use one-letter keys and nesting by indentation. Lists carry their
//! length, and string values are quoted only when they would be ambiguous.

use crate::models::{BatterContext, RichContext};

/// Key legend for a system prompt that consumes [`encode_compact`] output.
pub const COMPACT_SCHEMA: &str = "\
Compact context format:
- Sections use short keys: M=match, E=this delivery, B=batter, W=bowler,
  P=pressure, N=narrative, PR=partnership
- Lists carry a [N] length prefix
- Nested fields are indented two spaces
- Values are unquoted unless they contain special characters";

/// Characters that force a string value to be quoted.
const SPECIAL: [char; 10] = ['\n', '\t', ':', '[', ']', '{', '}', ',', '"', '\''];

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.starts_with(' ') || s.ends_with(' ') || s.contains(SPECIAL)
}

/// A string value, quoted and escaped if needed.
fn text(s: &str) -> String {
    if needs_quoting(s) {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else {
        s.to_string()
    }
}

/// A number rounded to `places`, without trailing zeros.
fn number(value: f32, places: usize) -> String {
    let s = format!("{:.*}", places, value);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn batter_status(batter: &BatterContext) -> Option<&'static str> {
    if batter.is_new_batter() {
        Some("new")
    } else if batter.is_struggling() {
        Some("struggling")
    } else if batter.is_settled() {
        Some("settled")
    } else {
        None
    }
}

#[derive(Default)]
struct CompactWriter {
    lines: Vec<String>,
}

impl CompactWriter {
    fn section(&mut self, key: &str) {
        self.lines.push(format!("{}:", key));
    }

    fn field(&mut self, key: &str, value: impl AsRef<str>) {
        self.lines.push(format!("  {}: {}", key, value.as_ref()));
    }

    fn list(&mut self, key: &str, items: &[String], indent: &str) {
        let values: Vec<String> = items.iter().map(|s| text(s)).collect();
        if values.is_empty() {
            self.lines.push(format!("{}{}[0]:", indent, key));
        } else {
            self.lines
                .push(format!("{}{}[{}]: {}", indent, key, values.len(), values.join(", ")));
        }
    }

    fn top(&mut self, key: &str, value: impl AsRef<str>) {
        self.lines.push(format!("{}: {}", key, value.as_ref()));
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Encode the context in the compact short-key form.
pub fn encode_compact(ctx: &RichContext) -> String {
    let mut w = CompactWriter::default();
    let m = &ctx.match_situation;

    w.section("M");
    w.list("teams", &[m.batting_team.clone(), m.bowling_team.clone()], "  ");
    w.field("score", format!("{}/{}", m.total_runs, m.total_wickets));
    w.field("overs", m.overs_completed.to_string());
    w.field("phase", m.phase.as_str());
    w.field("CRR", number(m.current_run_rate, 2));
    if let Some(target) = m.target {
        w.field("target", target.to_string());
    }
    if let Some(rrr) = m.required_rate {
        w.field("RRR", number(rrr, 2));
    }
    if let Some(need) = m.runs_required {
        w.field("need", need.to_string());
    }
    if let Some(balls) = m.balls_remaining {
        w.field("balls_left", balls.to_string());
    }

    let e = &ctx.event;
    w.section("E");
    w.field("type", e.kind().as_str());
    w.field("ball", e.ball.to_string());
    w.field("batter", text(&e.batter));
    w.field("bowler", text(&e.bowler));
    w.field("runs", e.runs_total.to_string());
    if let Some(d) = e.dismissal.as_ref().filter(|d| d.kind.is_wicket()) {
        w.field("wicket", d.kind.as_str());
        if let Some(fielder) = &d.fielder {
            w.field("fielder", text(fielder));
        }
    }

    let b = &ctx.batter;
    w.section("B");
    w.field("name", text(&b.name));
    w.field("runs", b.runs_scored.to_string());
    w.field("balls", b.balls_faced.to_string());
    w.field("SR", number(b.strike_rate, 1));
    w.field("4s", b.fours.to_string());
    w.field("6s", b.sixes.to_string());
    if let Some(milestone) = b.approaching_milestone {
        w.field("milestone", milestone.to_string());
    }
    if let Some(status) = batter_status(b) {
        w.field("status", status);
    }

    let bowler = &ctx.bowler;
    w.section("W");
    w.field("name", text(&bowler.name));
    w.field("overs", bowler.overs_bowled.to_string());
    w.field("runs", bowler.runs_conceded.to_string());
    w.field("wkts", bowler.wickets.to_string());
    w.field("econ", number(bowler.economy, 2));
    if bowler.is_on_hat_trick {
        w.field("hat_trick", "true");
    }

    w.section("P");
    w.field("level", ctx.pressure.as_str());
    w.field("score", number(ctx.pressure_score, 2));

    let n = &ctx.narrative;
    w.section("N");
    w.field("story", text(&n.current_storyline));
    w.field("tension", number(n.tension_level, 2));
    w.field("momentum", n.momentum.as_str());
    if let Some(subplot) = &n.key_subplot {
        w.field("subplot", text(subplot));
    }
    if let Some(potential) = &n.dramatic_potential {
        w.field("potential", text(potential));
    }
    if let Some(matchup) = &n.matchup_context {
        w.field("matchup", text(matchup));
    }
    if !n.callbacks_available.is_empty() {
        let shown = n.callbacks_available.len().min(3);
        w.list("callbacks", &n.callbacks_available[..shown], "  ");
    }

    if ctx.partnership.runs > 0 {
        w.section("PR");
        w.field("runs", ctx.partnership.runs.to_string());
        w.field("balls", ctx.partnership.balls.to_string());
    }

    w.top("tone", ctx.suggested_tone.as_str());
    w.top("length", ctx.suggested_length.as_str());
    if !ctx.avoid_phrases.is_empty() {
        w.list("avoid", &ctx.avoid_phrases, "");
    }

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ContextAssembler;
    use crate::config::ContextConfig;
    use cricket_rules::{BallNumber, DeliveryEvent, Dismissal, DismissalKind, MatchFormat, MatchInfo};

    fn context(events: &[DeliveryEvent], phrases: &[String]) -> RichContext {
        let info = MatchInfo::new("India", "Australia", MatchFormat::T20);
        let mut assembler = ContextAssembler::new(info, 1, ContextConfig::default());
        let (last, earlier) = events.split_last().unwrap();
        for event in earlier {
            assembler.advance(event).unwrap();
        }
        assembler.build(last, phrases).unwrap()
    }

    fn ball(n: u32) -> DeliveryEvent {
        DeliveryEvent::new(BallNumber::new(n / 6, n % 6 + 1), "V Kohli", "P Cummins", "S Gill")
    }

    #[test]
    fn test_quoting() {
        assert_eq!(text("V Kohli"), "V Kohli");
        assert_eq!(text(""), "\"\"");
        assert_eq!(text("Kohli, again"), "\"Kohli, again\"");
        assert_eq!(text("Boundaries flowing! Kohli: in control"), "\"Boundaries flowing! Kohli: in control\"");
        assert_eq!(text("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(text(" padded"), "\" padded\"");
    }

    #[test]
    fn test_number_trimming() {
        assert_eq!(number(0.5, 2), "0.5");
        assert_eq!(number(10.0, 2), "10");
        assert_eq!(number(8.456, 2), "8.46");
        assert_eq!(number(133.33, 1), "133.3");
    }

    #[test]
    fn test_sections_in_order() {
        let events: Vec<_> = (0..4).map(|n| ball(n).with_runs(1)).collect();
        let out = encode_compact(&context(&events, &[]));
        let headers: Vec<&str> = out.lines().filter(|l| !l.starts_with(' ')).collect();
        assert_eq!(headers[..7], ["M:", "E:", "B:", "W:", "P:", "N:", "PR:"]);
        assert!(headers[7].starts_with("tone: "));
        assert_eq!(headers[8], "length: medium");
        assert_eq!(headers.len(), 9);
        assert!(out.contains("  teams[2]: India, Australia"));
        assert!(out.contains("  score: 4/0"));
        assert!(out.contains("  overs: 0.4"));
        assert!(out.contains("  phase: powerplay"));
        assert!(out.contains("  name: V Kohli"));
        assert!(out.contains("  story: \"\""));
    }

    #[test]
    fn test_wicket_and_fielder() {
        let events = vec![
            ball(0).with_runs(4),
            ball(1).with_dismissal(
                Dismissal::new(DismissalKind::Caught, "V Kohli").with_fielder("S Smith"),
            ),
        ];
        let out = encode_compact(&context(&events, &[]));
        assert!(out.contains("  wicket: caught"));
        assert!(out.contains("  fielder: S Smith"));
        assert!(out.contains("tone: dramatic"));
        assert!(out.contains("length: short"));
    }

    #[test]
    fn test_avoid_list() {
        let phrases = vec!["what a shot".to_string(), "into the stands, again".to_string()];
        let out = encode_compact(&context(&[ball(0)], &phrases));
        assert!(out.ends_with("avoid[2]: what a shot, \"into the stands, again\""));
        // No runs yet, so no partnership section.
        assert!(!out.contains("PR:"));
    }
}
