//! Default catalog seed data
//!
//! Inserted on every open with `INSERT OR IGNORE`, so a fresh database
//! gets a playable ladder and an existing one is left untouched.

use anyhow::Result;

use super::GameDb;

pub(super) fn seed_catalog(db: &GameDb) -> Result<()> {
    let conn = db.conn();
    conn.execute_batch(SEED_SQL)?;
    Ok(())
}

const SEED_SQL: &str = r#"
INSERT OR IGNORE INTO levels (id, name, description, xp_required) VALUES
    (1,  'Dusty Plot',          'A patch of dirt and a dream.',                 0),
    (2,  'Sprouting Patch',     'The first seedlings are coming up.',           100),
    (3,  'Kitchen Garden',      'Enough to feed the household.',                250),
    (4,  'Market Garden',       'Neighbours are starting to buy.',              500),
    (5,  'Smallholding',        'A proper farm, if a modest one.',              900),
    (6,  'Orchard Keeper',      'Rows of trees and steady harvests.',           1400),
    (7,  'Greenhouse Grower',   'Crops out of season, all year round.',         2000),
    (8,  'Thriving Farm',       'The market stall has a queue.',                2800),
    (9,  'Country Estate',      'Fields as far as the fence line.',             3800),
    (10, 'Legendary Homestead', 'The farm every farmer talks about.',           5000);

INSERT OR IGNORE INTO plants (id, name, kind, growth_secs, value) VALUES
    (1, 'Lettuce',    'leaf',  90,   12),
    (2, 'Carrot',     'root',  180,  20),
    (3, 'Tomato',     'fruit', 300,  35),
    (4, 'Strawberry', 'fruit', 450,  55),
    (5, 'Corn',       'grain', 600,  60),
    (6, 'Pumpkin',    'gourd', 1200, 140);

INSERT OR IGNORE INTO irrigation_methods (id, name, efficiency, cost) VALUES
    (1, 'Watering Can', 0.60, 0),
    (2, 'Sprinkler',    0.80, 250),
    (3, 'Drip Line',    0.95, 600),
    (4, 'Smart Drip',   1.00, 1200);

INSERT OR IGNORE INTO unlocks (id, level_id, kind, item_id) VALUES
    (1,  1,  'plant',      1),
    (2,  1,  'irrigation', 1),
    (3,  2,  'plant',      2),
    (4,  2,  'tool',       1),
    (5,  3,  'plant',      3),
    (6,  3,  'irrigation', 2),
    (7,  4,  'plant',      4),
    (8,  5,  'plant',      5),
    (9,  5,  'irrigation', 3),
    (10, 6,  'plant',      6),
    (11, 7,  'irrigation', 4),
    (12, 8,  'tool',       2),
    (13, 10, 'other',      1);
"#;
