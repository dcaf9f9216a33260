//! Card decks for the two site modes.
//!
//! The site has two audiences: institutional clients and creators. Each mode
//! shows its own deck of cards. A [`Deck`] pairs the layout cards with the
//! display content the host renders inside them; the layout components only
//! ever see the cards.
//!
//! # Examples
//!
//! ```
//! use cardgrid_protocol::deck::{SiteMode, sample_deck};
//!
//! let deck = sample_deck(SiteMode::Institutional);
//! assert_eq!(deck.cards.len(), 8);
//! assert!(deck.content("services").is_some());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId, Priority};

/// Which audience the site is presenting to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SiteMode {
    /// Institutional services.
    #[default]
    Institutional,
    /// Creator and production services.
    Creator,
}

impl SiteMode {
    /// Returns the display name for this mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Institutional => "Institutional",
            Self::Creator => "Creator Studio",
        }
    }
}

/// Display content of one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    /// Card heading.
    pub title: String,
    /// One-line summary shown in expanded mode.
    pub summary: String,
}

/// A card collection plus its display content.
#[derive(Debug, Clone)]
pub struct Deck {
    /// The mode this deck belongs to.
    pub mode: SiteMode,
    /// Layout cards, in initial order.
    pub cards: Vec<Card>,
    content: HashMap<CardId, CardContent>,
}

impl Deck {
    /// Returns the display content for a card id, if any.
    #[must_use]
    pub fn content(&self, id: &str) -> Option<&CardContent> {
        self.content.get(&CardId::from(id))
    }

    /// Returns the title for a card id, falling back to the id itself.
    #[must_use]
    pub fn title<'a>(&'a self, id: &'a CardId) -> &'a str {
        self.content
            .get(id)
            .map_or_else(|| id.as_str(), |content| content.title.as_str())
    }
}

/// A builder for deck entries.
///
/// This is an internal helper to reduce boilerplate when declaring the
/// sample decks.
struct DeckBuilder {
    mode: SiteMode,
    cards: Vec<Card>,
    content: HashMap<CardId, CardContent>,
}

impl DeckBuilder {
    fn new(mode: SiteMode) -> Self {
        Self {
            mode,
            cards: Vec::new(),
            content: HashMap::new(),
        }
    }

    fn card(mut self, id: &str, priority: Priority, title: &str, summary: &str) -> Self {
        let order = u32::try_from(self.cards.len()).unwrap_or(u32::MAX);
        self.cards.push(Card::new(id, order).with_priority(priority));
        self.content.insert(
            CardId::from(id),
            CardContent {
                title: title.to_string(),
                summary: summary.to_string(),
            },
        );
        self
    }

    fn build(self) -> Deck {
        Deck {
            mode: self.mode,
            cards: self.cards,
            content: self.content,
        }
    }
}

/// Returns the sample deck for a site mode.
///
/// Both decks hold eight cards, enough to exceed the default crowding
/// threshold of six so that auto-collapse engages on small viewports.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::Priority;
/// use cardgrid_protocol::deck::{SiteMode, sample_deck};
///
/// let deck = sample_deck(SiteMode::Creator);
/// assert_eq!(deck.cards[0].priority, Priority::Pinned);
/// assert_eq!(deck.title(&deck.cards[0].id), "Creator Studio");
/// ```
#[must_use]
pub fn sample_deck(mode: SiteMode) -> Deck {
    match mode {
        SiteMode::Institutional => DeckBuilder::new(mode)
            .card(
                "overview",
                Priority::Pinned,
                "Institutional Services",
                "Managed IT for schools, clinics, and public offices",
            )
            .card(
                "services",
                Priority::High,
                "Service Catalog",
                "Networks, devices, identity, and backups under one contract",
            )
            .card(
                "pricing",
                Priority::High,
                "Pricing",
                "Per-seat plans with on-site support included",
            )
            .card(
                "compliance",
                Priority::Normal,
                "Compliance",
                "Audit-ready records and data residency guarantees",
            )
            .card(
                "case-studies",
                Priority::Normal,
                "Case Studies",
                "How a district of 40 schools cut downtime in half",
            )
            .card(
                "testimonials",
                Priority::Low,
                "Testimonials",
                "What administrators say after the first year",
            )
            .card(
                "faq",
                Priority::Low,
                "FAQ",
                "Contracts, onboarding timelines, and support hours",
            )
            .card(
                "contact",
                Priority::Normal,
                "Contact",
                "Book a site assessment with an engineer",
            )
            .build(),
        SiteMode::Creator => DeckBuilder::new(mode)
            .card(
                "studio",
                Priority::Pinned,
                "Creator Studio",
                "Production support for channels, podcasts, and streams",
            )
            .card(
                "production",
                Priority::High,
                "Production",
                "Editing, color, and sound handled end to end",
            )
            .card(
                "packages",
                Priority::High,
                "Packages",
                "Monthly bundles sized by upload cadence",
            )
            .card(
                "gear",
                Priority::Normal,
                "Gear Setup",
                "Camera, lighting, and encoder configuration",
            )
            .card(
                "portfolio",
                Priority::Normal,
                "Portfolio",
                "Recent launches and channel growth numbers",
            )
            .card(
                "reviews",
                Priority::Low,
                "Reviews",
                "Creators on turnaround times and revisions",
            )
            .card(
                "faq",
                Priority::Low,
                "FAQ",
                "File delivery, rights, and revision limits",
            )
            .card(
                "booking",
                Priority::Normal,
                "Booking",
                "Reserve a kickoff call with a producer",
            )
            .build(),
    }
}
