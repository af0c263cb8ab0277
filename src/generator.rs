/**
 * Local question generator, used when the generation service is disabled or
 * unreachable.
 *
 * Questions are drawn from a small pool of templates. Every option of a template
 * carries an identifier assigned when the template is defined, so after the options
 * are shuffled the correct one is found by identifier rather than by text, and
 * duplicate option texts cannot confuse the answer key.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::model::{index_for, label_for, Question, QuizConfig, MAX_OPTIONS};

/// A source of random permutations.
pub trait Shuffle {
    /// Reorder `items` in place.
    fn shuffle_slice<T>(&mut self, items: &mut [T]);
}

/// Uniform Fisher-Yates shuffling backed by a random number generator.
pub struct RandomShuffle<R> {
    rng: R,
}

impl RandomShuffle<StdRng> {
    /// Shuffle with a generator seeded from the operating system.
    pub fn new() -> Self {
        RandomShuffle {
            rng: StdRng::from_entropy(),
        }
    }

    /// Shuffle reproducibly: the same seed always gives the same permutations.
    pub fn seeded(seed: u64) -> Self {
        RandomShuffle {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Shuffle for RandomShuffle<R> {
    fn shuffle_slice<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// An option together with the identifier it was given at definition time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TaggedOption {
    id: usize,
    text: String,
}

/// A question template. `{topic}` in the prompt or explanation is replaced by the topic
/// of the quiz.
#[derive(Debug, Clone)]
pub struct Template {
    prompt: String,
    options: Vec<TaggedOption>,
    correct: usize,
    explanation: Option<String>,
}

impl Template {
    /// Define a template whose correct option is labelled `answer` in the order given.
    ///
    /// Panics if there are more options than letters or `answer` does not label one of
    /// `options`; templates are fixed at compile time.
    pub fn new(prompt: &str, options: &[&str], answer: char, explanation: Option<&str>) -> Self {
        if options.len() > MAX_OPTIONS {
            panic!("template has {} options, at most {} can be labelled", options.len(), MAX_OPTIONS);
        }
        let correct = match index_for(answer) {
            Some(i) if i < options.len() => i,
            _ => panic!("template answer '{}' is out of range", answer),
        };
        Template {
            prompt: String::from(prompt),
            options: options
                .iter()
                .enumerate()
                .map(|(id, text)| TaggedOption {
                    id,
                    text: String::from(*text),
                })
                .collect(),
            correct,
            explanation: explanation.map(String::from),
        }
    }

    /// Produce a question from the template with its options shuffled. The template
    /// itself is never modified.
    fn instantiate<S: Shuffle>(&self, topic: &str, shuffler: &mut S) -> Question {
        let mut options = self.options.clone();
        shuffler.shuffle_slice(&mut options);

        // Identifiers are unique within a template and there are at most `MAX_OPTIONS`
        // of them, so exactly one option matches and it has a label.
        let answer = options
            .iter()
            .position(|o| o.id == self.correct)
            .and_then(label_for)
            .unwrap_or('A');

        Question {
            prompt: fill(&self.prompt, topic),
            options: options.into_iter().map(|o| o.text).collect(),
            answer,
            explanation: self.explanation.as_ref().map(|e| fill(e, topic)),
        }
    }
}

/// The built-in template pool.
pub fn default_templates() -> Vec<Template> {
    vec![
        Template::new(
            "Which of the following is NOT a core data type in {topic}?",
            &["Integer", "Float", "Boolean", "Character"],
            'D',
            Some("{topic} uses 'string' to represent sequences of characters, not a dedicated 'character' type."),
        ),
        Template::new(
            "What is the output of the following code snippet: `print(type(5/2))`?",
            &["<class 'int'>", "<class 'float'>", "<class 'str'>", "<class 'bool'>"],
            'B',
            Some("Division in Python 3 results in a float."),
        ),
        Template::new(
            "Which keyword is used to create a function in Python?",
            &["def", "func", "function", "lambda"],
            'A',
            Some("Use def to define functions."),
        ),
    ]
}

/// Generate `config.count` questions from the built-in templates.
pub fn generate<S: Shuffle>(config: &QuizConfig, shuffler: &mut S) -> Vec<Question> {
    generate_from(&default_templates(), &config.topic, config.count, shuffler)
}

/// Generate `count` questions, the i-th from `templates[i % templates.len()]`. Templates
/// are reused when `count` exceeds the size of the pool.
pub fn generate_from<S: Shuffle>(
    templates: &[Template],
    topic: &str,
    count: usize,
    shuffler: &mut S,
) -> Vec<Question> {
    if templates.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|i| templates[i % templates.len()].instantiate(topic, shuffler))
        .collect()
}

/// Return the questions in a random order, leaving `questions` untouched.
pub fn shuffle_questions<S: Shuffle>(questions: &[Question], shuffler: &mut S) -> Vec<Question> {
    let mut shuffled = questions.to_vec();
    shuffler.shuffle_slice(&mut shuffled);
    shuffled
}

fn fill(text: &str, topic: &str) -> String {
    text.replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    /// Reverses its input, for predictable "shuffles".
    struct Reverse;

    impl Shuffle for Reverse {
        fn shuffle_slice<T>(&mut self, items: &mut [T]) {
            items.reverse();
        }
    }

    /// Leaves its input alone.
    struct Identity;

    impl Shuffle for Identity {
        fn shuffle_slice<T>(&mut self, _items: &mut [T]) {}
    }

    #[test]
    fn answer_follows_the_correct_option() {
        let templates = vec![Template::new(
            "Which of the following is NOT a core data type in {topic}?",
            &["Integer", "Float", "Boolean", "Character"],
            'D',
            None,
        )];

        let questions = generate_from(&templates, "python", 1, &mut Reverse);
        assert_eq!(
            questions[0].options,
            vec!["Character", "Boolean", "Float", "Integer"]
        );
        assert_eq!(questions[0].answer, 'A');
        assert_eq!(
            questions[0].prompt,
            "Which of the following is NOT a core data type in python?"
        );
    }

    #[test]
    fn generated_answers_stay_valid_under_random_shuffles() {
        let templates = default_templates();
        let mut shuffler = RandomShuffle::seeded(7);
        for _ in 0..50 {
            let questions = generate_from(&templates, "python", 9, &mut shuffler);
            for (i, q) in questions.iter().enumerate() {
                assert!(q.validate().is_ok());
                let template = &templates[i % templates.len()];
                assert_eq!(
                    q.correct_option(),
                    Some(template.options[template.correct].text.as_str())
                );
            }
        }
    }

    #[test]
    fn duplicate_option_texts_do_not_confuse_the_answer() {
        let templates = vec![Template::new("Pick the first", &["same", "same", "other"], 'A', None)];
        // Reversed, the correct option moves to the end, behind its twin.
        let questions = generate_from(&templates, "x", 1, &mut Reverse);
        assert_eq!(questions[0].options, vec!["other", "same", "same"]);
        assert_eq!(questions[0].answer, 'C');
    }

    #[test]
    #[should_panic]
    fn templates_cannot_have_more_options_than_letters() {
        let options: Vec<String> = (0..27).map(|i| format!("o{}", i)).collect();
        let options: Vec<&str> = options.iter().map(|o| o.as_str()).collect();
        Template::new("Too many", &options, 'A', None);
    }

    #[test]
    fn count_is_respected() {
        let config = QuizConfig::new("python", "", Difficulty::Mixed, 7).unwrap();
        let questions = generate(&config, &mut RandomShuffle::new());
        assert_eq!(questions.len(), 7);

        let questions = generate_from(&default_templates(), "python", 0, &mut Identity);
        assert!(questions.is_empty());
    }

    #[test]
    fn templates_are_reused_in_order() {
        let templates = vec![
            Template::new("zero", &["a", "b"], 'A', None),
            Template::new("one", &["a", "b"], 'A', None),
            Template::new("two", &["a", "b"], 'A', None),
        ];
        let questions = generate_from(&templates, "x", 5, &mut RandomShuffle::seeded(1));
        let prompts: Vec<&str> = questions.iter().map(|q| q.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["zero", "one", "two", "zero", "one"]);
    }

    #[test]
    fn shuffling_does_not_alter_templates() {
        let templates = default_templates();
        let before: Vec<Vec<TaggedOption>> = templates.iter().map(|t| t.options.clone()).collect();
        generate_from(&templates, "python", 6, &mut Reverse);
        let after: Vec<Vec<TaggedOption>> = templates.iter().map(|t| t.options.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn shuffle_questions_is_a_permutation() {
        let questions = generate_from(&default_templates(), "python", 6, &mut Identity);
        let original = questions.clone();
        let shuffled = shuffle_questions(&questions, &mut RandomShuffle::seeded(3));

        assert_eq!(shuffled.len(), questions.len());
        for q in questions.iter() {
            let expected = questions.iter().filter(|x| *x == q).count();
            let got = shuffled.iter().filter(|x| *x == q).count();
            assert_eq!(expected, got);
        }

        let reversed = shuffle_questions(&questions, &mut Reverse);
        assert_eq!(reversed.first(), questions.last());
        assert_eq!(questions, original);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = QuizConfig::new("python", "", Difficulty::Easy, 5).unwrap();
        let first = generate(&config, &mut RandomShuffle::seeded(42));
        let second = generate(&config, &mut RandomShuffle::seeded(42));
        assert_eq!(first, second);
    }
}
