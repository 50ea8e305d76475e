//! Budget-based filtering of the venue, caterer and entertainment catalogs.

use std::collections::BTreeMap;
use std::fmt;

use tracing::info;

use crate::plan::{Caterer, EntertainmentOption, PartyPlan, Priced, Venue};
use crate::planner::Planner;

/// Recommendation categories, ordered as they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Venues,
    Caterers,
    Entertainment,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Venues => "Venues",
            Category::Caterers => "Caterers",
            Category::Entertainment => "Entertainment",
        })
    }
}

/// A catalog entry that fits the budget, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Venue(Venue),
    Caterer(Caterer),
    Entertainment(EntertainmentOption),
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Venue(v) => v.name(),
            CatalogEntry::Caterer(c) => c.name(),
            CatalogEntry::Entertainment(e) => e.name(),
        }
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEntry::Venue(v) => write!(f, "{} (Cost: ${})", v.name, v.cost),
            CatalogEntry::Caterer(c) => {
                write!(f, "{} (Cost per person: ${})", c.name, c.cost_per_person)
            }
            CatalogEntry::Entertainment(e) => write!(f, "{} (Cost: ${})", e.name, e.cost),
        }
    }
}

/// Qualifying entries per category. A category with nothing affordable has
/// no key at all.
pub type Recommendations = BTreeMap<Category, Vec<CatalogEntry>>;

/// Everything in the plan's catalogs that fits within `budget`.
///
/// Venues and entertainment qualify when `cost <= budget`. Caterers qualify
/// when `cost_per_person * effective guest count <= budget`, where an empty
/// guest list counts as [`DEFAULT_GUEST_COUNT`](crate::plan::DEFAULT_GUEST_COUNT)
/// guests. Catalog order is kept within each category.
pub fn recommend(plan: &PartyPlan, budget: f64) -> Recommendations {
    let guests = plan.effective_guest_count();
    let mut out = Recommendations::new();

    insert_affordable(&mut out, Category::Venues, &plan.venues, budget, guests, |v| {
        CatalogEntry::Venue(v.clone())
    });
    insert_affordable(&mut out, Category::Caterers, &plan.caterers, budget, guests, |c| {
        CatalogEntry::Caterer(c.clone())
    });
    insert_affordable(
        &mut out,
        Category::Entertainment,
        &plan.entertainment_options,
        budget,
        guests,
        |e| CatalogEntry::Entertainment(e.clone()),
    );

    out
}

fn insert_affordable<T: Priced>(
    out: &mut Recommendations,
    category: Category,
    catalog: &[T],
    budget: f64,
    guest_count: usize,
    tag: impl Fn(&T) -> CatalogEntry,
) {
    let entries: Vec<CatalogEntry> = catalog
        .iter()
        .filter(|item| item.estimated_cost(guest_count) <= budget)
        .map(tag)
        .collect();
    if !entries.is_empty() {
        out.insert(category, entries);
    }
}

impl Planner {
    pub fn recommend(&self, budget: f64) -> Recommendations {
        let recs = recommend(&self.plan, budget);
        info!(
            budget,
            categories = recs.len(),
            "recommendations generated"
        );
        recs
    }

    /// Recommendations for the stored budget, or `None` while no positive
    /// budget has been set.
    pub fn recommend_within_budget(&self) -> Option<Recommendations> {
        let budget = self.budget();
        if budget > 0.0 {
            Some(self.recommend(budget))
        } else {
            None
        }
    }
}
