use crate::tier::Tier;
use serde::Serialize;

/// Widget a question is answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Single-line free text
    Text,
    /// Multi-line free text
    TextArea,
    Slider { min: i64, max: i64, default: i64 },
    Choice { options: &'static [&'static str] },
    Number { min: i64, max: i64, default: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

const fn text(key: &'static str, label: &'static str, placeholder: Option<&'static str>) -> Question {
    Question { key, label, kind: QuestionKind::Text, placeholder }
}

const fn text_area(
    key: &'static str,
    label: &'static str,
    placeholder: Option<&'static str>,
) -> Question {
    Question { key, label, kind: QuestionKind::TextArea, placeholder }
}

const fn slider(key: &'static str, label: &'static str, default: i64) -> Question {
    Question {
        key,
        label,
        kind: QuestionKind::Slider { min: 1, max: 10, default },
        placeholder: None,
    }
}

const fn choice(key: &'static str, label: &'static str, options: &'static [&'static str]) -> Question {
    Question { key, label, kind: QuestionKind::Choice { options }, placeholder: None }
}

pub const COMMUNITY_QUESTIONS: &[Question] = &[
    text_area(
        "q1_goal_90",
        "1. What is your top goal for the next 90 days?",
        Some("E.g. Reset my career direction, stabilise my finances, regain emotional clarity…"),
    ),
    slider("clarity", "2. How clear do you feel about your direction right now?", 5),
    choice(
        "drain",
        "3. What is draining your energy the most at the moment?",
        &[
            "Work stress",
            "Relationship tension",
            "Financial pressure",
            "Health / fatigue",
            "Lack of clarity",
            "Overwhelm",
            "Fear of failure",
            "Other / not sure",
        ],
    ),
    text(
        "strength",
        "4. What is one strength that really defines you?",
        Some("E.g. Strategic thinking, empathy, persistence, creativity..."),
    ),
    choice(
        "state",
        "5. How would you describe your current emotional state?",
        &[
            "Calm",
            "Stressed",
            "Distracted",
            "Motivated",
            "Overwhelmed",
            "Hopeful",
            "Uncertain",
            "Exhausted",
        ],
    ),
    choice(
        "delay_reason",
        "6. When you delay tasks, what is usually the main reason?",
        &[
            "Fear of doing it wrong",
            "Not sure where to start",
            "Low energy",
            "Distraction",
            "Feeling unmotivated",
            "Feeling incapable",
            "The task feels too big",
            "Emotional avoidance",
        ],
    ),
    text_area(
        "pattern_to_change",
        "7. What recurring pattern do you most want to change?",
        Some("E.g. Overthinking decisions, avoiding difficult conversations, starting but not finishing..."),
    ),
    text_area(
        "pattern_to_strengthen",
        "8. What pattern in you do you want to strengthen or see more of?",
        Some("E.g. Following through, staying calm under pressure, daily prayer, learning consistently..."),
    ),
    slider("readiness", "9. How ready do you feel for change right now?", 7),
];

pub const LAB_QUESTIONS: &[Question] = &[
    text(
        "one_liner",
        "1. In one sentence, what are you building?",
        Some("E.g. A tool that helps remote teams run async standups."),
    ),
    text_area(
        "user_problem",
        "2. Who is your user and what problem are you solving right now?",
        Some("E.g. Early-stage founders who struggle to prioritise weekly tasks."),
    ),
    slider(
        "pain_confidence",
        "3. How confident are you that this problem is painful enough? (1–10)",
        6,
    ),
    choice(
        "exec_bottleneck",
        "4. Where is your biggest execution bottleneck at the moment?",
        &[
            "Shipping fast",
            "Customer conversations",
            "Technical build",
            "Focus",
            "Market clarity",
            "Prioritisation",
            "Something else",
        ],
    ),
    text_area(
        "blocker_this_week",
        "5. What is stopping your product or idea from making progress this week?",
        Some("E.g. Fear of launching, unclear next step, too many parallel tasks..."),
    ),
    Question {
        key: "hours_per_week",
        label: "6. How many hours per week can you realistically allocate to building?",
        kind: QuestionKind::Number { min: 0, max: 168, default: 10 },
        placeholder: None,
    },
    choice(
        "founder_pattern",
        "7. Which pattern best describes you most often?",
        &[
            "Overthinking",
            "Overbuilding",
            "Under-talking to customers",
            "Fear of launching",
            "No prioritisation",
            "Burnout loops",
            "None of these / not sure",
        ],
    ),
    text(
        "runway",
        "8. What is your current runway context (if applicable)?",
        Some("E.g. 6 months of savings, building alongside a job, funded for 12 months..."),
    ),
    text_area(
        "day_30_success",
        "9. What outcome would make the next 30 days a massive success?",
        Some("E.g. 5 real users using the product weekly, or a working prototype tested by 3 customers."),
    ),
    slider(
        "learning_speed",
        "10. How quickly do you typically learn from each build–measure–learn cycle? (1–10)",
        7,
    ),
    text_area(
        "biggest_constraint",
        "11. What is the single constraint that scares you the most?",
        Some("E.g. Running out of money, never shipping, wrong market..."),
    ),
    text_area(
        "no_fear_build",
        "12. If fear wasn't a factor, what would you build or launch in the next 7 days?",
        Some("Be specific."),
    ),
];

pub const PRO_QUESTIONS: &[Question] = &[
    text(
        "strategy_sentence",
        "1. In one sentence, what is your company's strategy?",
        Some("E.g. Become the leading provider of X for Y by doing Z."),
    ),
    slider(
        "leadership_alignment",
        "2. How aligned is your leadership team on this strategy? (1–10)",
        6,
    ),
    text(
        "top_priority",
        "3. What is your #1 strategic priority for the next 12 months?",
        Some("E.g. Expand into a new market, stabilise core operations..."),
    ),
    text_area(
        "execution_consistency",
        "4. How consistently does your organisation execute on agreed priorities?",
        Some("Be honest — are priorities followed through or frequently displaced?"),
    ),
    choice(
        "customer_understanding",
        "5. How well do you understand your customers' evolving needs?",
        &["Low", "Medium", "High"],
    ),
    choice(
        "biggest_bottleneck",
        "6. Where is your greatest operational bottleneck right now?",
        &[
            "People",
            "Process",
            "Technology",
            "Clarity of direction",
            "Incentives / accountability",
            "Something else",
        ],
    ),
    slider(
        "role_clarity",
        "7. How clear are roles and responsibilities across teams? (1–10)",
        5,
    ),
    text_area(
        "decision_speed",
        "8. How fast can your organisation make key decisions?",
        Some("E.g. Weeks of meetings, or decisions made within days..."),
    ),
    text_area(
        "culture_description",
        "9. How would you describe your culture in a sentence or two?",
        None,
    ),
    text_area(
        "change_adaptability",
        "10. How adaptable is your organisation to change?",
        Some("E.g. Moves quickly but chaotically, or slow but stable..."),
    ),
    choice(
        "tech_maturity",
        "11. What best describes your technology / data maturity?",
        &[
            "Very low (mostly manual / spreadsheets)",
            "Emerging (some systems, not integrated)",
            "Developing (core systems in place, gaps remain)",
            "Advanced (integrated platforms, data-driven decisions)",
        ],
    ),
    text_area(
        "why_understanding",
        "12. How well do teams understand the 'why' behind major initiatives?",
        Some("E.g. Only leadership understands, or well-communicated across teams..."),
    ),
    text_area(
        "resistance_areas",
        "13. Where do you see the most resistance to change?",
        Some("E.g. Middle management, specific departments, frontline staff..."),
    ),
    text_area(
        "capability_gap",
        "14. What is the biggest capability gap you can see today?",
        Some("E.g. Data literacy, leadership depth, product management..."),
    ),
    text_area(
        "operating_model_issue",
        "15. What part of your operating model feels misaligned or outdated?",
        Some("E.g. Org structure, incentive model, reporting lines..."),
    ),
    text_area(
        "quarter_outcome",
        "16. What is the most important outcome you want in the next quarter?",
        None,
    ),
    text_area(
        "break_risk",
        "17. If everything stayed the same for 12 months, what would break?",
        None,
    ),
    slider(
        "leadership_commitment",
        "18. How committed is leadership to real transformation? (1–10)",
        7,
    ),
];

/// Ordered question set for a tier.
pub fn questions_for(tier: Tier) -> &'static [Question] {
    match tier {
        Tier::Community => COMMUNITY_QUESTIONS,
        Tier::Lab => LAB_QUESTIONS,
        Tier::Pro => PRO_QUESTIONS,
    }
}

pub fn find_question(tier: Tier, key: &str) -> Option<&'static Question> {
    questions_for(tier).iter().find(|q| q.key == key)
}

/// Every answer key across all tiers, community first, in declared order.
pub fn all_answer_keys() -> impl Iterator<Item = &'static str> {
    Tier::ALL
        .into_iter()
        .flat_map(|tier| questions_for(tier).iter().map(|q| q.key))
}
