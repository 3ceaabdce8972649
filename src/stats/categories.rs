// The category table: a closed mapping from symbolic stat names to the
// numeric ids used by the statistics provider.
//
// The ids are provider-defined and versioned; changing any entry is a
// breaking change to normalization output (row labels) and to the set of
// categories that are averaged rather than summed across seasons.

use std::collections::BTreeMap;

macro_rules! stat_categories {
    ($($variant:ident = $id:literal => $label:literal,)+) => {
        /// One statistic type tracked by the provider.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum StatCategory {
            $($variant = $id,)+
        }

        impl StatCategory {
            /// Every known category, in table order.
            pub const ALL: &'static [StatCategory] = &[$(StatCategory::$variant,)+];

            /// Resolve a provider category id to its symbolic entry.
            pub fn from_id(id: u32) -> Option<StatCategory> {
                match id {
                    $($id => Some(StatCategory::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable label (the lower-cased constant name).
            pub fn label(self) -> &'static str {
                match self {
                    $(StatCategory::$variant => $label,)+
                }
            }
        }
    };
}

stat_categories! {
    // Match participation
    Appearances = 321 => "appearances",
    Lineups = 322 => "lineups",
    Bench = 323 => "bench",
    MinutesPlayed = 119 => "minutes_played",
    Captain = 40 => "captain",
    Substitutions = 59 => "substitutions",

    // Scoring
    Goals = 52 => "goals",
    PenaltiesScored = 111 => "penalties_scored",
    PenaltiesMissed = 112 => "penalties_missed",
    OwnGoals = 324 => "own_goals",
    HitWoodwork = 64 => "hit_woodwork",

    // Shooting
    ShotsTotal = 42 => "shots_total",
    ShotsOnTarget = 86 => "shots_on_target",
    ShotsOffTarget = 41 => "shots_off_target",
    ShotsBlocked = 58 => "shots_blocked",

    // Passing
    Passes = 80 => "passes",
    AccuratePasses = 116 => "accurate_passes",
    KeyPasses = 117 => "key_passes",
    Assists = 79 => "assists",
    ThroughBalls = 124 => "through_balls",
    ThroughBallsWon = 125 => "through_balls_won",
    LongBalls = 122 => "long_balls",
    LongBallsWon = 123 => "long_balls_won",
    CrossesTotal = 98 => "crosses_total",
    CrossesAccurate = 99 => "crosses_accurate",

    // Defending
    Tackles = 78 => "tackles",
    Interceptions = 100 => "interceptions",
    Clearances = 101 => "clearances",
    Blocks = 97 => "blocks",
    ErrorLeadToGoal = 571 => "error_lead_to_goal",

    // Duels
    TotalDuels = 105 => "total_duels",
    DuelsWon = 106 => "duels_won",
    AerialsWon = 107 => "aerials_won",
    DribbleAttempts = 108 => "dribble_attempts",
    SuccessfulDribbles = 109 => "successful_dribbles",
    DribbledPast = 110 => "dribbled_past",
    Dispossessed = 94 => "dispossessed",

    // Discipline
    Fouls = 56 => "fouls",
    FoulsDrawn = 96 => "fouls_drawn",
    YellowCards = 84 => "yellow_cards",
    RedCards = 83 => "red_cards",
    YellowRedCards = 85 => "yellow_red_cards",
    Offsides = 51 => "offsides",

    // Goalkeeper
    Saves = 57 => "saves",
    SavesInsideBox = 104 => "saves_inside_box",
    Punches = 103 => "punches",
    GoalsConceded = 88 => "goals_conceded",

    // Rating
    Rating = 118 => "rating",
}

impl StatCategory {
    /// The provider's numeric id for this category.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Categories whose multi-season aggregation uses the arithmetic mean
    /// instead of the sum. Per-match ratings are meaningless when summed.
    pub const AVERAGED: &'static [StatCategory] = &[StatCategory::Rating];

    /// Numeric ids of the averaged categories, for the aggregator.
    pub fn averaged_ids() -> Vec<u32> {
        Self::AVERAGED.iter().map(|c| c.id()).collect()
    }

    /// Label to use for an arbitrary category id: the symbolic label when
    /// the id is known, otherwise the id rendered as a string.
    pub fn label_for_id(id: u32) -> String {
        match StatCategory::from_id(id) {
            Some(cat) => cat.label().to_string(),
            None => id.to_string(),
        }
    }

    /// The full table as label -> id, echoed back in tool responses so the
    /// model can reference category ids in follow-up calls.
    pub fn table() -> BTreeMap<&'static str, u32> {
        Self::ALL.iter().map(|c| (c.label(), c.id())).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
