use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::models::{CommandOption, Embed};
use crate::router::Router;
use crate::Error;

const EIGHT_BALL_ANSWERS: [&str; 3] = ["Yes", "No", "Maybe"];

const UWU_WORDS: [(&str, &str); 10] = [
    ("you're", "yuw'we"),
    ("your", "yur"),
    ("you", "yuw"),
    ("thing", "fing"),
    ("some", "sum"),
    ("tho", "fo"),
    ("fi", "fwi"),
    ("th", "d"),
    ("l", "w"),
    ("r", "w"),
];

const OWO_WORDS: [(&str, &str); 8] = [
    ("wanna", "wawna"),
    ("your", "ywour"),
    ("cute", "cwute"),
    ("this", "dis"),
    ("may", "mway"),
    ("of", "owf"),
    ("as", "aws"),
    ("m", "mw"),
];

/// Replacement table compiled into one alternation, longest words first.
struct WordSwap {
    pattern: Regex,
    words: HashMap<&'static str, &'static str>,
}

impl WordSwap {
    fn new(table: &[(&'static str, &'static str)]) -> Self {
        let alternation = table
            .iter()
            .map(|(find, _)| regex::escape(find))
            .collect::<Vec<_>>()
            .join("|");

        Self {
            pattern: Regex::new(&alternation).expect("word table is a valid pattern"),
            words: table.iter().copied().collect(),
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &regex::Captures| {
                self.words.get(&caps[0]).copied().unwrap_or_default()
            })
            .into_owned()
    }
}

pub fn uwuify(text: &str) -> String {
    static SWAP: OnceLock<WordSwap> = OnceLock::new();
    SWAP.get_or_init(|| WordSwap::new(&UWU_WORDS)).apply(text)
}

pub fn owoify(text: &str) -> String {
    static SWAP: OnceLock<WordSwap> = OnceLock::new();
    SWAP.get_or_init(|| WordSwap::new(&OWO_WORDS)).apply(text)
}

/// Reply for a guess against the secret number.
pub fn guess_reply(guess: i64, secret: i64) -> String {
    if !(1..=20).contains(&guess) {
        return "> Please make your guess between 1 - 20".to_string();
    }

    if guess == secret {
        "> You guessed the number!".to_string()
    } else {
        format!("> You didn't guess the number, it was {secret}")
    }
}

/// Add the fun commands to `router`.
pub fn register(router: &mut Router) {
    router
        .interaction("8ball", "Let the 8ball take the wheel")
        .handle(|_inter, _opts| async move {
            let answer = EIGHT_BALL_ANSWERS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or("Maybe");
            Ok::<_, Error>(format!("> {answer}"))
        });

    router
        .interaction("uwuify", "Uwuify a Message.")
        .option(CommandOption::string("text", "Text to Uwuify"))
        .handle(|_inter, opts| async move {
            let text = opts.string("text").ok_or("missing option 'text'")?;
            Ok::<_, Error>(format!(">>> {}", uwuify(text)))
        });

    router
        .interaction("owoify", "Owoify a Message.")
        .option(CommandOption::string("text", "Text to Owoify"))
        .handle(|_inter, opts| async move {
            let text = opts.string("text").ok_or("missing option 'text'")?;
            Ok::<_, Error>(format!(">>> {}", owoify(text)))
        });

    router
        .interaction("embed", "Embed your message.")
        .option(CommandOption::string("title", "Title for the embed"))
        .option(CommandOption::string("description", "Embed Description").optional())
        .handle(|_inter, opts| async move {
            let title = opts.string("title").ok_or("missing option 'title'")?;
            Ok::<_, Error>(Embed::new(title).description(opts.string("description").unwrap_or_default()))
        });

    router
        .interaction(
            "GuessTheNumber",
            "See if you can guess the number, Between (1 - 20)",
        )
        .option(CommandOption::integer("guess", "Guess the number"))
        .handle(|_inter, opts| async move {
            let guess = opts.integer("guess").ok_or("missing option 'guess'")?;
            let secret = rand::thread_rng().gen_range(1..=20);
            debug!("guessed {guess}, number was {secret}");
            Ok::<_, Error>(guess_reply(guess, secret))
        });

    router
        .interaction("Boolean", "Example of a boolean Input")
        .option(CommandOption::boolean("guess", "Input"))
        .handle(|_inter, opts| async move {
            Ok::<_, Error>(opts.boolean("guess").ok_or("missing option 'guess'")?)
        });
}
