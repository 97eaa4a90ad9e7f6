//! Game systems organized by domain.
//!
//! Every system takes the whole `GameState` and reads or mutates what it
//! needs:
//! - `movement`: Tile collision probes and velocity integration
//! - `npc`: Path following, pursuit states and freezing
//! - `enemy`: Pursuit trigger and melee contact on top of the NPC layer
//! - `variants`: Per-variant hooks (heal, explode, share damage, summon)
//! - `combat`: Damage, healing and death handling
//! - `player`: Stamina, melee sweep and skill upgrades
//! - `coins`: Coin pickups and their respawn

pub mod coins;
pub mod combat;
pub mod enemy;
pub mod movement;
pub mod npc;
pub mod player;
pub mod variants;
