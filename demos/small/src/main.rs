//! small — synthesises a toy town and logs per-layer contact statistics.
//!
//! Usage: `small [SEED]`.  Set `RUST_LOG=debug` for per-layer progress.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pn_core::{Age, AgeBrackets, ContactMatrix, Layer, NetworkConfig, PersonId, PopRng, SchoolMixing};
use pn_groups::SizeDistribution;
use pn_pop::{GroupLayerInputs, PopulationBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_SEED:    u64   = 42;
const HOUSEHOLDS:      usize = 1_500;
const FACILITIES:      usize = 3;
const RESIDENTS_EACH:  usize = 30;
const BRACKETS:        usize = 16;

// ── Toy town ──────────────────────────────────────────────────────────────────

struct Town {
    ages:       Vec<Age>,
    households: Vec<Vec<PersonId>>,
    facilities: Vec<Vec<PersonId>>,
}

fn toy_town(rng: &mut PopRng) -> Town {
    let mut ages = Vec::new();
    let mut households = Vec::with_capacity(HOUSEHOLDS);

    for _ in 0..HOUSEHOLDS {
        let size: usize = rng.gen_range(1..=5);
        let head: Age = rng.gen_range(20..=85);
        let mut members = Vec::with_capacity(size);
        for k in 0..size {
            let age = match k {
                0 => head,
                1 => head.saturating_sub(rng.gen_range(0..=5)).max(18),
                // Children only in younger households.
                _ if head < 55 => rng.gen_range(0..=17),
                _ => rng.gen_range(18..=85),
            };
            members.push(PersonId(ages.len() as u32));
            ages.push(age);
        }
        households.push(members);
    }

    let mut facilities = Vec::with_capacity(FACILITIES);
    for _ in 0..FACILITIES {
        let mut residents = Vec::with_capacity(RESIDENTS_EACH);
        for _ in 0..RESIDENTS_EACH {
            residents.push(PersonId(ages.len() as u32));
            ages.push(rng.gen_range(75..=99));
        }
        facilities.push(residents);
    }

    Town { ages, households, facilities }
}

/// Heavy diagonal, lighter neighbouring brackets, a floor everywhere else.
fn banded_matrix(diagonal: f64, neighbour: f64, floor: f64) -> Result<ContactMatrix> {
    let rows = (0..BRACKETS)
        .map(|i| {
            (0..BRACKETS)
                .map(|j| match i.abs_diff(j) {
                    0 => diagonal,
                    1 => neighbour,
                    _ => floor,
                })
                .collect()
        })
        .collect();
    Ok(ContactMatrix::from_rows(rows)?)
}

fn rates(ages: std::ops::RangeInclusive<Age>, rate: f64) -> BTreeMap<Age, f64> {
    ages.map(|a| (a, rate)).collect()
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("seed must be an integer, got {arg:?}"))?,
        None => DEFAULT_SEED,
    };

    let town = toy_town(&mut PopRng::new(seed));
    info!(people = town.ages.len(), households = town.households.len(), "toy town generated");

    let mut config = NetworkConfig { seed, ..NetworkConfig::default() };
    config.school.mixing = SchoolMixing::AgeClustered;
    config.school.non_teaching_staff = Some(15.0);
    config.ltcf.enabled = true;

    let schools = GroupLayerInputs {
        rates:  rates(5..=17, 0.95),
        sizes:  SizeDistribution::new(vec![(40.0, 50..=150), (45.0, 151..=400), (15.0, 401..=800)])?,
        matrix: banded_matrix(10.0, 2.0, 0.1)?,
    };
    let workplaces = GroupLayerInputs {
        rates:  rates(18..=70, 0.7),
        sizes:  SizeDistribution::new(vec![(55.0, 1..=4), (20.0, 5..=9), (15.0, 10..=19), (10.0, 20..=99)])?,
        matrix: banded_matrix(3.0, 2.0, 1.0)?,
    };

    let start = Instant::now();
    let population = PopulationBuilder::new(config, town.ages, AgeBrackets::uniform(BRACKETS, 5, 100)?)
        .households(town.households)
        .facilities(town.facilities)
        .schools(schools)
        .workplaces(workplaces)
        .build()?;
    let elapsed = start.elapsed();

    let teachers: usize = population.schools.iter().map(|s| s.teachers.len()).sum();
    let workers: usize = population.workplaces.iter().map(Vec::len).sum();
    info!(
        schools = population.schools.len(),
        teachers,
        workplaces = population.workplaces.len(),
        workers,
        facilities = population.facilities.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "network synthesised"
    );

    for layer in Layer::ALL {
        if let Some(stats) = population.degree_stats(layer) {
            info!(
                %layer,
                edges = stats.edges,
                mean_degree = stats.mean,
                max_degree = stats.max,
                isolated = stats.isolated,
                "layer summary"
            );
        }
    }

    Ok(())
}
