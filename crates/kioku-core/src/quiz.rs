//! Multiple-choice quiz helpers
//!
//! A card is asked as "which meaning matches this word?" with the correct
//! item mixed among up to three distractors from the same category. A correct
//! pick is graded `Good`, a wrong one `Again`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::{Item, ItemId};
use crate::scheduler::Grade;

/// Wrong answers offered next to the correct one
pub const DISTRACTOR_COUNT: usize = 3;

/// Shuffled answer options for `correct`, drawn from `deck`.
///
/// Distractors come from the same category as the correct item and never
/// repeat it. Small decks yield fewer than four options.
pub fn generate_options<R>(deck: &[Item], correct: &Item, rng: &mut R) -> Vec<Item>
where
    R: Rng + ?Sized,
{
    let pool: Vec<&Item> = deck
        .iter()
        .filter(|item| item.id != correct.id && item.category() == correct.category())
        .collect();

    let mut options: Vec<Item> = pool
        .choose_multiple(rng, DISTRACTOR_COUNT)
        .map(|item| (*item).clone())
        .collect();
    options.push(correct.clone());
    options.shuffle(rng);
    options
}

/// Whether the chosen option is the correct item
pub fn is_correct(correct: &Item, chosen: ItemId) -> bool {
    correct.id == chosen
}

/// Grade assigned to an automatically checked answer
pub fn grade_for_answer(correct: bool) -> Grade {
    if correct { Grade::Good } else { Grade::Again }
}
