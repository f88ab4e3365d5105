//! Continuity scoring.
//!
//! A fixed heuristic, not a model: a per-mode baseline, a bonus for a
//! carried-over anchor, small bonuses for non-trivial prompt layers and an
//! extra penalty when strict mode runs without an anchor.

use tracing::debug;

use reel_models::{ContinuationMode, ContinuityEvaluation};

/// Threshold used when the caller supplies none or an invalid one.
pub const DEFAULT_THRESHOLD: f64 = 0.75;

const STRICT_BASE: f64 = 0.62;
const BALANCED_BASE: f64 = 0.72;
const LOOSE_BASE: f64 = 0.80;

const ANCHOR_BONUS: f64 = 0.18;
const DIRECTOR_BONUS: f64 = 0.05;
const CINEMATOGRAPHER_BONUS: f64 = 0.07;
const STRICT_NO_ANCHOR_PENALTY: f64 = 0.08;

/// Prompt layers shorter than this earn no bonus.
const MIN_PROMPT_CHARS: usize = 24;

/// Inputs of one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ContinuityInputs<'a> {
    pub mode: ContinuationMode,
    pub has_anchor: bool,
    pub director_prompt: &'a str,
    pub cinematographer_prompt: &'a str,
    pub threshold: Option<f64>,
}

/// Clamp a caller threshold to [0, 1]; absent or non-finite means the default.
pub fn normalize_threshold(threshold: Option<f64>) -> f64 {
    match threshold {
        Some(t) if t.is_finite() => t.clamp(0.0, 1.0),
        _ => DEFAULT_THRESHOLD,
    }
}

fn base_score(mode: ContinuationMode) -> f64 {
    match mode {
        ContinuationMode::Off => 1.0,
        ContinuationMode::Strict => STRICT_BASE,
        ContinuationMode::Balanced => BALANCED_BASE,
        ContinuationMode::Loose => LOOSE_BASE,
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_substantial(text: &str) -> bool {
    text.trim().chars().count() > MIN_PROMPT_CHARS
}

/// Score a shot and decide whether it should be regenerated.
pub fn evaluate_continuity(inputs: &ContinuityInputs<'_>) -> ContinuityEvaluation {
    let threshold = normalize_threshold(inputs.threshold);

    if inputs.mode == ContinuationMode::Off {
        return ContinuityEvaluation {
            score: 1.0,
            recommend_regenerate: false,
            reason: "Continuation mode is off; shot framing is user-directed and not scored."
                .to_string(),
        };
    }

    let mut score = base_score(inputs.mode);
    if inputs.has_anchor {
        score += ANCHOR_BONUS;
    }
    if is_substantial(inputs.director_prompt) {
        score += DIRECTOR_BONUS;
    }
    if is_substantial(inputs.cinematographer_prompt) {
        score += CINEMATOGRAPHER_BONUS;
    }
    if inputs.mode == ContinuationMode::Strict && !inputs.has_anchor {
        score -= STRICT_NO_ANCHOR_PENALTY;
    }
    // Constants are hundredths; summing them in f64 drifts (0.72 + 0.18 != 0.90).
    let score = round_hundredths(score).clamp(0.0, 1.0);

    // Equal to the threshold passes.
    let recommend_regenerate = score < threshold;

    let reason = if !recommend_regenerate {
        format!(
            "Continuity score {:.2} meets threshold {:.2}.",
            score, threshold
        )
    } else if !inputs.has_anchor {
        format!(
            "Continuity score {:.2} is below threshold {:.2}: no anchor frame was available. \
             Add an anchor frame from the previous shot before generating.",
            score, threshold
        )
    } else {
        format!(
            "Continuity score {:.2} is below threshold {:.2} even with an anchor frame: \
             prompt layers are too weak. Tighten camera and continuity constraints.",
            score, threshold
        )
    };

    debug!(
        mode = %inputs.mode,
        has_anchor = inputs.has_anchor,
        score,
        threshold,
        recommend_regenerate,
        "Evaluated shot continuity"
    );

    ContinuityEvaluation {
        score,
        recommend_regenerate,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RICH: &str = "Slow dolly-in along the pier, keep horizon level, dawn light.";

    fn inputs(mode: ContinuationMode, has_anchor: bool) -> ContinuityInputs<'static> {
        ContinuityInputs {
            mode,
            has_anchor,
            director_prompt: RICH,
            cinematographer_prompt: RICH,
            threshold: None,
        }
    }

    #[test]
    fn test_off_mode_always_passes() {
        for has_anchor in [true, false] {
            let eval = evaluate_continuity(&ContinuityInputs {
                threshold: Some(1.0),
                director_prompt: "",
                ..inputs(ContinuationMode::Off, has_anchor)
            });
            assert_eq!(eval.score, 1.0);
            assert!(!eval.recommend_regenerate);
            assert!(eval.reason.contains("user-directed"));
        }
    }

    #[test]
    fn test_formula_per_mode() {
        let cases = [
            (ContinuationMode::Strict, true, 0.92),
            (ContinuationMode::Strict, false, 0.66),
            (ContinuationMode::Balanced, true, 1.0),
            (ContinuationMode::Balanced, false, 0.84),
            (ContinuationMode::Loose, false, 0.92),
            (ContinuationMode::Loose, true, 1.0),
        ];
        for (mode, has_anchor, expected) in cases {
            let eval = evaluate_continuity(&inputs(mode, has_anchor));
            assert!(
                (eval.score - expected).abs() < 1e-9,
                "{mode} anchor={has_anchor}: {} != {expected}",
                eval.score
            );
        }
    }

    #[test]
    fn test_anchor_strictly_raises_score() {
        for mode in [
            ContinuationMode::Strict,
            ContinuationMode::Balanced,
            ContinuationMode::Loose,
        ] {
            for (director, cinematographer) in [("", ""), (RICH, ""), ("", RICH)] {
                let base = ContinuityInputs {
                    mode,
                    has_anchor: false,
                    director_prompt: director,
                    cinematographer_prompt: cinematographer,
                    threshold: None,
                };
                let without = evaluate_continuity(&base).score;
                let with = evaluate_continuity(&ContinuityInputs {
                    has_anchor: true,
                    ..base
                })
                .score;
                assert!(with > without, "{mode}: {with} <= {without}");
            }
        }
    }

    #[test]
    fn test_score_equal_to_threshold_does_not_regenerate() {
        let eval = evaluate_continuity(&ContinuityInputs {
            mode: ContinuationMode::Loose,
            has_anchor: false,
            director_prompt: "",
            cinematographer_prompt: "short",
            threshold: Some(0.80),
        });
        assert_eq!(eval.score, 0.80);
        assert!(!eval.recommend_regenerate);
        assert!(eval.reason.contains("meets threshold 0.80"));
    }

    #[test]
    fn test_nominal_score_as_threshold_never_regenerates() {
        // Expected scores computed in hundredths to avoid the drift under test.
        for (mode, base) in [
            (ContinuationMode::Strict, 62),
            (ContinuationMode::Balanced, 72),
            (ContinuationMode::Loose, 80),
        ] {
            for has_anchor in [true, false] {
                for (director, director_bonus) in [("", 0), (RICH, 5)] {
                    for (cinematographer, cine_bonus) in [("", 0), (RICH, 7)] {
                        let mut cents: i32 = base + director_bonus + cine_bonus;
                        if has_anchor {
                            cents += 18;
                        } else if mode == ContinuationMode::Strict {
                            cents -= 8;
                        }
                        let nominal = f64::from(cents.clamp(0, 100)) / 100.0;

                        let eval = evaluate_continuity(&ContinuityInputs {
                            mode,
                            has_anchor,
                            director_prompt: director,
                            cinematographer_prompt: cinematographer,
                            threshold: Some(nominal),
                        });
                        assert_eq!(eval.score, nominal, "{mode} anchor={has_anchor}");
                        assert!(
                            !eval.recommend_regenerate,
                            "{mode} anchor={has_anchor}: {}",
                            eval.reason
                        );
                        assert!(eval.reason.contains("meets threshold"));
                    }
                }
            }
        }
    }

    #[test]
    fn test_balanced_anchor_only_meets_point_nine() {
        let eval = evaluate_continuity(&ContinuityInputs {
            mode: ContinuationMode::Balanced,
            has_anchor: true,
            director_prompt: "",
            cinematographer_prompt: "",
            threshold: Some(0.90),
        });
        assert_eq!(eval.score, 0.90);
        assert!(!eval.recommend_regenerate);
        assert!(eval.reason.contains("Continuity score 0.90 meets threshold 0.90"));
    }

    #[test]
    fn test_reason_distinguishes_failure_modes() {
        let no_anchor = evaluate_continuity(&ContinuityInputs {
            mode: ContinuationMode::Strict,
            has_anchor: false,
            director_prompt: "",
            cinematographer_prompt: "",
            threshold: Some(0.9),
        });
        assert!(no_anchor.recommend_regenerate);
        assert!(no_anchor.reason.contains("0.54"));
        assert!(no_anchor.reason.contains("0.90"));
        assert!(no_anchor.reason.contains("Add an anchor frame"));

        let weak_prompts = evaluate_continuity(&ContinuityInputs {
            mode: ContinuationMode::Strict,
            has_anchor: true,
            director_prompt: "",
            cinematographer_prompt: "",
            threshold: Some(0.9),
        });
        assert!(weak_prompts.recommend_regenerate);
        assert!(weak_prompts.reason.contains("0.80"));
        assert!(weak_prompts.reason.contains("Tighten"));
    }

    #[test]
    fn test_threshold_normalization() {
        assert_eq!(normalize_threshold(None), DEFAULT_THRESHOLD);
        assert_eq!(normalize_threshold(Some(f64::NAN)), DEFAULT_THRESHOLD);
        assert_eq!(normalize_threshold(Some(1.7)), 1.0);
        assert_eq!(normalize_threshold(Some(-0.2)), 0.0);
        assert_eq!(normalize_threshold(Some(0.6)), 0.6);
    }

    #[test]
    fn test_prompt_length_counts_characters() {
        // 25 characters after trimming
        let just_over = "   abcdefghijklmnopqrstuvwxy   ";
        let at_limit = "abcdefghijklmnopqrstuvwx";
        let base = ContinuityInputs {
            mode: ContinuationMode::Balanced,
            has_anchor: false,
            director_prompt: just_over,
            cinematographer_prompt: "",
            threshold: None,
        };
        let over = evaluate_continuity(&base);
        let at = evaluate_continuity(&ContinuityInputs {
            director_prompt: at_limit,
            ..base
        });
        assert!((over.score - 0.77).abs() < 1e-9);
        assert!((at.score - 0.72).abs() < 1e-9);
    }
}
