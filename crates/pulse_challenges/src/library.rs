//! Fixed content the schedulers draw from.

use rand::Rng;
use std::sync::Arc;

/// Chooses an index below the given length.
pub type Picker = Arc<dyn Fn(usize) -> usize + Send + Sync>;

pub fn random_picker() -> Picker {
    Arc::new(|len| rand::thread_rng().gen_range(0..len))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeTemplate {
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub points: u32,
}

pub const WEEKLY_CHALLENGES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "gratitude-notes",
        category: "Gratitude",
        title: "Three Thank-Yous",
        description: "Tell your partner three specific things you appreciated about them this week.",
        points: 10,
    },
    ChallengeTemplate {
        id: "tech-free-dinner",
        category: "Quality Time",
        title: "Tech-Free Dinner",
        description: "Share one meal together with both phones out of reach.",
        points: 15,
    },
    ChallengeTemplate {
        id: "new-recipe",
        category: "Adventure",
        title: "Cook Something New",
        description: "Pick a recipe neither of you has made before and cook it together.",
        points: 20,
    },
    ChallengeTemplate {
        id: "memory-lane",
        category: "Connection",
        title: "Memory Lane",
        description: "Look through old photos together and share your favourite memory from each.",
        points: 10,
    },
    ChallengeTemplate {
        id: "love-letter",
        category: "Romance",
        title: "Handwritten Letter",
        description: "Write your partner a short handwritten letter and leave it somewhere they will find it.",
        points: 25,
    },
    ChallengeTemplate {
        id: "sunset-walk",
        category: "Quality Time",
        title: "Sunset Walk",
        description: "Take a walk together around sunset and talk about your week.",
        points: 10,
    },
    ChallengeTemplate {
        id: "dream-board",
        category: "Future",
        title: "Dream Board",
        description: "Each list three things you want to do together in the next year, then compare.",
        points: 15,
    },
    ChallengeTemplate {
        id: "playlist-swap",
        category: "Fun",
        title: "Playlist Swap",
        description: "Make a five-song playlist for your partner and listen to each other's picks.",
        points: 10,
    },
    ChallengeTemplate {
        id: "surprise-favour",
        category: "Kindness",
        title: "Secret Favour",
        description: "Take one chore off your partner's plate without being asked.",
        points: 15,
    },
    ChallengeTemplate {
        id: "question-night",
        category: "Connection",
        title: "Twenty Questions",
        description: "Ask each other questions you have never asked before, at least ten each.",
        points: 20,
    },
    ChallengeTemplate {
        id: "mini-adventure",
        category: "Adventure",
        title: "Somewhere New",
        description: "Visit a cafe, park or shop in your area that neither of you has been to.",
        points: 20,
    },
    ChallengeTemplate {
        id: "compliment-day",
        category: "Romance",
        title: "Compliment Day",
        description: "Give your partner a genuine compliment every day this week.",
        points: 15,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTemplate {
    pub id: &'static str,
    pub question: &'static str,
}

#[rustfmt::skip]
pub const DAILY_QUESTIONS: &[QuestionTemplate] = &[
    QuestionTemplate { id: "q-highlight", question: "What was the best part of your day?" },
    QuestionTemplate { id: "q-first-impression", question: "What did you first notice about me?" },
    QuestionTemplate { id: "q-perfect-weekend", question: "Describe your perfect weekend together." },
    QuestionTemplate { id: "q-small-joy", question: "What small thing made you smile recently?" },
    QuestionTemplate { id: "q-travel", question: "Where should we travel next, and why?" },
    QuestionTemplate { id: "q-comfort-food", question: "What is your ultimate comfort food?" },
    QuestionTemplate { id: "q-proud", question: "What is something you are proud of this month?" },
    QuestionTemplate { id: "q-song", question: "Which song reminds you of us?" },
    QuestionTemplate { id: "q-support", question: "How can I support you better this week?" },
    QuestionTemplate { id: "q-childhood", question: "What is a favourite memory from your childhood?" },
    QuestionTemplate { id: "q-superpower", question: "If you could have one superpower, what would it be?" },
    QuestionTemplate { id: "q-tradition", question: "What tradition would you like us to start?" },
    QuestionTemplate { id: "q-laugh", question: "When did I last make you laugh really hard?" },
    QuestionTemplate { id: "q-goal", question: "What is one goal you want us to reach together?" },
];
