use crate::state::StandingsRow;

/// League-wide bounds used to normalize team scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeagueExtrema {
    pub max_goals_for: u32,
    pub max_goals_against: u32,
    pub min_goals_against: u32,
}

impl LeagueExtrema {
    pub fn from_rows(rows: &[StandingsRow]) -> Self {
        let Some(first) = rows.first() else {
            return Self::default();
        };
        let mut out = Self {
            max_goals_for: first.goals_for,
            max_goals_against: first.goals_against,
            min_goals_against: first.goals_against,
        };
        for row in &rows[1..] {
            out.max_goals_for = out.max_goals_for.max(row.goals_for);
            out.max_goals_against = out.max_goals_against.max(row.goals_against);
            out.min_goals_against = out.min_goals_against.min(row.goals_against);
        }
        out
    }
}

/// Comparative 0-100 metrics for one team.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreVector {
    pub attack: f64,
    pub defense: f64,
    pub win_rate: f64,
    pub recent_form: f64,
    pub dominance: f64,
}

impl ScoreVector {
    pub fn axes(&self) -> [(&'static str, f64); 5] {
        [
            ("Attack", self.attack),
            ("Defense", self.defense),
            ("Win rate", self.win_rate),
            ("Form", self.recent_form),
            ("Dominance", self.dominance),
        ]
    }
}

pub fn score_vector(row: &StandingsRow, extrema: &LeagueExtrema) -> ScoreVector {
    let attack = ratio(row.goals_for as f64, extrema.max_goals_for as f64);

    // Uniform (or inverted) bounds carry no spread to rank against.
    let defense = if extrema.max_goals_against <= extrema.min_goals_against {
        50.0
    } else {
        let span = extrema.max_goals_against as f64 - extrema.min_goals_against as f64;
        let conceded_below_max =
            extrema.max_goals_against as f64 - row.goals_against as f64;
        ratio(conceded_below_max, span)
    };

    let win_rate = ratio(row.wins as f64, row.played as f64);
    let dominance = ratio(row.points as f64, 3.0 * row.played as f64);

    ScoreVector {
        attack,
        defense,
        win_rate,
        recent_form: recent_form(&row.form),
        dominance,
    }
}

/// W=3, D=1, anything else 0, over the maximum available from the string.
pub fn recent_form(form: &str) -> f64 {
    let (points, len) = form.chars().fold((0u32, 0u32), |(pts, n), c| {
        let p = match c {
            'W' => 3,
            'D' => 1,
            _ => 0,
        };
        (pts.saturating_add(p), n.saturating_add(1))
    });
    ratio(points as f64, 3.0 * len as f64)
}

/// Score every row against one extrema pass, preserving row order.
pub fn score_table(rows: &[StandingsRow]) -> Vec<ScoreVector> {
    let extrema = LeagueExtrema::from_rows(rows);
    rows.iter().map(|row| score_vector(row, &extrema)).collect()
}

pub fn league_average(vectors: &[ScoreVector]) -> ScoreVector {
    if vectors.is_empty() {
        return ScoreVector::default();
    }
    let n = vectors.len() as f64;
    let sum = vectors.iter().fold(ScoreVector::default(), |acc, v| ScoreVector {
        attack: acc.attack + v.attack,
        defense: acc.defense + v.defense,
        win_rate: acc.win_rate + v.win_rate,
        recent_form: acc.recent_form + v.recent_form,
        dominance: acc.dominance + v.dominance,
    });
    ScoreVector {
        attack: clamp_score(sum.attack / n),
        defense: clamp_score(sum.defense / n),
        win_rate: clamp_score(sum.win_rate / n),
        recent_form: clamp_score(sum.recent_form / n),
        dominance: clamp_score(sum.dominance / n),
    }
}

// Zero denominators (no matches, no goals, empty form) score 0.
fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 {
        return 0.0;
    }
    clamp_score(100.0 * num / den)
}

fn clamp_score(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, 4.0), 25.0);
    }

    #[test]
    fn clamp_handles_nan_and_overshoot() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(100.000_000_1), 100.0);
        assert_eq!(clamp_score(-0.1), 0.0);
    }

    #[test]
    fn unknown_form_codes_count_toward_length() {
        // W + ? = 3 of a possible 6.
        assert!((recent_form("W?") - 50.0).abs() < 1e-9);
    }
}
