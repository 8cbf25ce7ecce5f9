//! Onboarding questionnaire.
//!
//! A fixed list of single-choice questions walked through with
//! [`Questionnaire`]. Answers stay local; completing the walk only flips
//! `has_completed_questionnaire` on the profile.

use std::collections::HashMap;

use crate::error::CoachError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub options: &'static [&'static str],
}

pub const QUESTIONS: [Question; 10] = [
    Question {
        id: "time_frame",
        text: "How long have you been playing guitar?",
        options: &[
            "3+ years",
            "1-3 years",
            "6 months - 1 year",
            "Less than 6 months",
            "Never played before",
        ],
    },
    Question {
        id: "play_style",
        text: "What type(s) of guitar do you play?",
        options: &["Acoustic", "Electric", "Classical", "Bass"],
    },
    Question {
        id: "technical_skills",
        text: "Which of these can you comfortably play?",
        options: &[
            "Open chords (C, G, D, A, E, Am, etc.)",
            "Barre chords (F, Bm, etc.)",
            "Power chords",
            "Basic strumming patterns",
            "Fingerpicking patterns",
        ],
    },
    Question {
        id: "switching_chords",
        text: "How would you rate your ability to switch chords smoothly?",
        options: &[
            "Very Comfortable at fast tempos",
            "Comfortable at moderate tempos",
            "Okay at slow tempos",
            "Still learning",
        ],
    },
    Question {
        id: "song_playing",
        text: "Can you play a song from start to finish?",
        options: &[
            "Yes, confidently",
            "Yes, at slower tempos",
            "With pauses or mistakes",
            "Not yet",
        ],
    },
    Question {
        id: "techniques",
        text: "Which technique are you most comfortable with?",
        options: &[
            "Palm muting",
            "Hammer-ons",
            "Pull-offs",
            "Slides",
            "Bends",
            "Vibrato",
            "Tapping",
        ],
    },
    Question {
        id: "preference",
        text: "What styles are you most interested in?",
        options: &[
            "Rock",
            "Pop",
            "Blues",
            "Jazz",
            "Metal",
            "Acoustic / Folk",
            "R&B / Neo-soul",
        ],
    },
    Question {
        id: "practicing",
        text: "How much time can you practice per day?",
        options: &["15 minutes", "30 minutes", "1 hour", "More than 1 hour"],
    },
    Question {
        id: "goal",
        text: "What best describes your current goal?",
        options: &[
            "Becoming an advanced player",
            "Performing or recording",
            "Playing confidently with others",
            "Playing songs for fun",
            "Just starting out",
        ],
    },
    Question {
        id: "favorite_artist",
        text: "Who is your current favorite artist or band?",
        options: &["Bad Bunny"],
    },
];

/// Where the walk moved after [`Questionnaire::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Question(usize),
    Complete,
}

#[derive(Debug, Clone)]
pub struct Questionnaire {
    questions: &'static [Question],
    started: bool,
    index: usize,
    selected: Option<&'static str>,
    answers: HashMap<&'static str, &'static str>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new(&QUESTIONS)
    }
}

impl Questionnaire {
    pub fn new(questions: &'static [Question]) -> Self {
        Self {
            questions,
            started: false,
            index: 0,
            selected: None,
            answers: HashMap::new(),
        }
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&'static Question> {
        if !self.started {
            return None;
        }
        self.questions.get(self.index)
    }

    pub fn selected(&self) -> Option<&'static str> {
        self.selected
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    /// Completed share of the walk in percent, counting the current question.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 100.0;
        }
        (self.index + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    /// Selects option `choice` (zero-based) of the current question.
    pub fn select(&mut self, choice: usize) -> Result<&'static str, CoachError> {
        let question = self
            .current()
            .ok_or_else(|| CoachError::NotReady("questionnaire has not started".to_string()))?;
        let option = question.options.get(choice).copied().ok_or_else(|| {
            CoachError::InvalidInput(format!(
                "option must be between 1 and {}",
                question.options.len()
            ))
        })?;
        self.selected = Some(option);
        Ok(option)
    }

    /// Stores the selection and advances. Requires a selection.
    pub fn next(&mut self) -> Result<Step, CoachError> {
        let question = self
            .current()
            .ok_or_else(|| CoachError::NotReady("questionnaire has not started".to_string()))?;
        let answer = self
            .selected
            .ok_or_else(|| CoachError::InvalidInput("select an option first".to_string()))?;

        self.answers.insert(question.id, answer);
        if self.is_last() {
            return Ok(Step::Complete);
        }
        self.index += 1;
        self.selected = self.answers.get(self.questions[self.index].id).copied();
        Ok(Step::Question(self.index))
    }

    /// Goes back one question and restores its answer. No-op on the first one.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.selected = self.answers.get(self.questions[self.index].id).copied();
        true
    }

    pub fn answer(&self, id: &str) -> Option<&'static str> {
        self.answers.get(id).copied()
    }

    pub fn answers(&self) -> &HashMap<&'static str, &'static str> {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(|q| self.answers.contains_key(q.id))
    }
}
