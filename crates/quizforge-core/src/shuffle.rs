//! Question and option randomization.
//!
//! Both levels use `SliceRandom::shuffle` (Fisher–Yates), so every ordering
//! is equally likely given a uniform generator. The generator is always
//! passed in; seed a `StdRng` for reproducible sessions.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Question, SessionQuestion};

/// A uniformly random permutation of `0..len`.
pub fn permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

/// Permute one question's options and remap its correct index.
pub fn shuffle_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> SessionQuestion {
    let option_order = permutation(question.options.len(), rng);
    let options = option_order
        .iter()
        .map(|&old| question.options[old].clone())
        .collect();

    let mut correct_option = 0;
    for (new, &old) in option_order.iter().enumerate() {
        if old == question.correct_option {
            correct_option = new;
        }
    }

    SessionQuestion {
        question_id: question.id.clone(),
        text: question.text.clone(),
        options,
        correct_option,
        option_order,
    }
}

/// Permute the question order, then each question's options independently.
pub fn shuffle_questions<R: Rng + ?Sized>(
    questions: &[Question],
    rng: &mut R,
) -> Vec<SessionQuestion> {
    permutation(questions.len(), rng)
        .into_iter()
        .map(|i| shuffle_options(&questions[i], rng))
        .collect()
}
