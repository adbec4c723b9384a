use crate::backend::ConstraintBackend;
use crate::config::RefineConfig;
use crate::dsl::{parse_sketch, RuleSet};
use crate::engine::{evaluate, DecisionReason, Verdict};
use crate::errors::GeneratorError;
use crate::generator::SketchGenerator;
use crate::refine::answer::{Answer, Attempt, AttemptOutcome, FinalAnswer};

/// Refinement loop state
#[derive(Debug)]
enum LoopState {
    GenerateSketch { feedback: Option<String> },
    CompileAndDecide { sketch: RuleSet },
    Fallback,
    Done(Answer),
}

/// Drives generator and solver until the query is decided or the budget runs out
pub struct Refiner<'a> {
    backend: &'a dyn ConstraintBackend,
    generator: &'a dyn SketchGenerator,
    max_iterations: usize,
}

impl<'a> Refiner<'a> {
    pub fn new(
        backend: &'a dyn ConstraintBackend,
        generator: &'a dyn SketchGenerator,
        config: &RefineConfig,
    ) -> Self {
        Self {
            backend,
            generator,
            max_iterations: config.max_iterations,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Answer `question`. Only generator failures are returned as errors.
    pub async fn answer(&self, question: &str) -> Result<Answer, GeneratorError> {
        let mut attempts: Vec<Attempt> = Vec::new();
        let mut last_fingerprint: Option<String> = None;
        let mut state = LoopState::GenerateSketch { feedback: None };

        loop {
            state = match state {
                LoopState::GenerateSketch { .. } if attempts.len() >= self.max_iterations => {
                    LoopState::Fallback
                }
                LoopState::GenerateSketch { feedback } => {
                    let iteration = attempts.len() + 1;
                    tracing::info!(
                        "Iteration {}/{}: requesting sketch from {}",
                        iteration,
                        self.max_iterations,
                        self.generator.name()
                    );
                    let text = self.generator.generate(question, feedback.as_deref()).await?;
                    match parse_sketch(&text) {
                        Ok(sketch) => LoopState::CompileAndDecide { sketch },
                        Err(e) => {
                            tracing::warn!("Iteration {}: malformed sketch: {}", iteration, e);
                            attempts.push(Attempt {
                                iteration,
                                fingerprint: None,
                                outcome: AttemptOutcome::Malformed { error: e.to_string() },
                            });
                            LoopState::GenerateSketch {
                                feedback: Some(malformed_feedback(&e.to_string())),
                            }
                        }
                    }
                }
                LoopState::CompileAndDecide { sketch } => {
                    let iteration = attempts.len() + 1;
                    let fingerprint = sketch.fingerprint();
                    let repeated = last_fingerprint.as_deref() == Some(fingerprint.as_str());
                    last_fingerprint = Some(fingerprint.clone());

                    let evaluation = evaluate(self.backend, &sketch).await;
                    let decision = evaluation.decision;
                    tracing::info!(
                        "Iteration {}: sketch {} query '{}' -> {} ({:?})",
                        iteration,
                        fingerprint,
                        sketch.query,
                        decision.verdict,
                        decision.reason
                    );
                    if !evaluation.report.is_clean() {
                        tracing::debug!("Iteration {}: compile report {:?}", iteration, evaluation.report);
                    }

                    if decision.verdict.is_decided() {
                        attempts.push(Attempt {
                            iteration,
                            fingerprint: Some(fingerprint),
                            outcome: AttemptOutcome::Decided { verdict: decision.verdict },
                        });
                        let answer = if decision.verdict == Verdict::Yes {
                            FinalAnswer::Yes
                        } else {
                            FinalAnswer::No
                        };
                        LoopState::Done(Answer {
                            answer,
                            sketch: Some(sketch),
                            attempts: std::mem::take(&mut attempts),
                        })
                    } else {
                        attempts.push(Attempt {
                            iteration,
                            fingerprint: Some(fingerprint),
                            outcome: AttemptOutcome::Undecided { reason: decision.reason },
                        });
                        LoopState::GenerateSketch {
                            feedback: Some(undecided_feedback(&sketch, decision.reason, repeated)),
                        }
                    }
                }
                LoopState::Fallback => {
                    tracing::info!(
                        "No decision after {} iterations, asking {} for a direct answer",
                        attempts.len(),
                        self.generator.name()
                    );
                    let text = self.generator.fallback_answer(question).await?;
                    LoopState::Done(Answer {
                        answer: FinalAnswer::Fallback(text.trim().to_string()),
                        sketch: None,
                        attempts: std::mem::take(&mut attempts),
                    })
                }
                LoopState::Done(answer) => return Ok(answer),
            };
        }
    }
}

fn malformed_feedback(error: &str) -> String {
    format!(
        "JSON parse error from generator output. Please output valid JSON. Error: {}",
        error
    )
}

fn undecided_feedback(sketch: &RuleSet, reason: DecisionReason, repeated: bool) -> String {
    let mut feedback = format!(
        "Solver could not decide. Sketch was: {}. Refine the rules.",
        sketch.to_json()
    );
    match reason {
        DecisionReason::Underdetermined => {
            feedback.push_str(" The rules allow the query to be either true or false.");
        }
        DecisionReason::Inconsistent => {
            feedback.push_str(" The rules contradict each other.");
        }
        DecisionReason::Indeterminate => {
            feedback.push_str(" The solver returned no result.");
        }
        DecisionReason::Forced => {}
    }
    if repeated {
        feedback.push_str(" This is the same sketch as the previous attempt.");
    }
    feedback
}
