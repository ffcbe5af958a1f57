//! Demo client for the myelin runtime.
//!
//! ```text
//! Client
//!   ├─→ Runtime (engine, catalogs, repository)
//!   └─→ NotificationReceiver (rendered to stdout)
//! ```
//!
//! The client seeds a small party, plays a scripted opening and then hands
//! control to the runtime's tick loop until ctrl-c or `MYELIN_TICKS`.

mod builder;
pub mod logging;

pub use builder::ClientBuilder;

use anyhow::Result;
use tracing::{debug, info, warn};

use myelin_core::{ActorState, EntityId, PartyId, RoomId};
use myelin_runtime::{NotificationReceiver, Runtime};

/// Demo party: id, name, room, passives.
const PARTY: [(EntityId, &str, u32, &[&str]); 3] = [
    (EntityId(1), "Mira", 1, &["disfigured"]),
    (EntityId(2), "Bram", 1, &[]),
    (EntityId(3), "Oska", 2, &[]),
];

pub struct Client {
    runtime: Runtime,
    notifications: NotificationReceiver,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    fn new(runtime: Runtime, notifications: NotificationReceiver) -> Self {
        Self {
            runtime,
            notifications,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    /// Renders every pending notification as `Name: text`.
    pub fn drain_messages(&mut self) -> Vec<String> {
        drain(&self.runtime, &mut self.notifications)
    }

    /// Restores the demo party from saves, creating members that have none.
    pub fn seed_party(&mut self) -> Result<()> {
        for (id, name, room, passives) in PARTY {
            if self.runtime.load_actor(id)? {
                debug!(actor = %id, "restored from save");
                continue;
            }
            let mut actor = ActorState::new(id, name)
                .with_level(4)
                .in_room(RoomId(room))
                .in_party(PartyId(1));
            actor.attributes.set("willpower", 20, 0);
            actor.attributes.set("intellect", 14, 0);
            actor.resources.add("leather", 3);
            self.runtime.add_actor(actor, passives)?;
        }
        Ok(())
    }

    /// Scripted opening: a skirmish, a heal and some items.
    ///
    /// Player-facing failures arrive as notifications, so they are only
    /// logged here.
    pub fn play_opening(&mut self) -> Result<()> {
        let [(mira, ..), (bram, ..), (oska, ..)] = PARTY;

        self.runtime.apply_damage(mira, "health", 15)?;
        self.runtime.apply_damage(bram, "health", 30)?;
        self.runtime.apply_damage(oska, "health", 10)?;

        if let Err(err) = self.runtime.use_skill(mira, "cloudmend") {
            debug!(%err, "cloudmend failed");
        }

        let censer = self.runtime.create_item("cloud_censer")?;
        if let Err(err) = self.runtime.use_item(oska, censer) {
            debug!(%err, "censer failed");
        }

        let tonic = self.runtime.create_item("bull_tonic")?;
        for _ in 0..2 {
            if let Err(err) = self.runtime.use_item(bram, tonic) {
                debug!(%err, "tonic failed");
            }
        }

        let pouch = self.runtime.create_item("alms_pouch")?;
        self.runtime.pick_up(mira, pouch)?;

        match self.runtime.craft(bram, "leather cap") {
            Ok(experience) => println!("Bram crafts a leather cap. (+{experience} xp)"),
            Err(err) => warn!(%err, "crafting failed"),
        }
        Ok(())
    }

    /// Prints each party member's effect listing.
    pub fn print_effects(&self) -> Result<()> {
        for (id, name, ..) in PARTY {
            println!("== {name} ==");
            for line in self.runtime.effects_view(id)? {
                println!("{line}");
            }
        }
        Ok(())
    }

    /// Plays the opening, runs the tick loop until ctrl-c and saves the
    /// party.
    pub async fn run(mut self) -> Result<()> {
        self.seed_party()?;
        self.play_opening()?;
        for message in self.drain_messages() {
            println!("{message}");
        }
        self.print_effects()?;

        let shutdown = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(%err, "ctrl-c handler unavailable; running until the tick limit");
                std::future::pending::<()>().await;
            }
        };

        let notifications = &mut self.notifications;
        let ticks = self
            .runtime
            .run_with(shutdown, |runtime, _| {
                for message in drain(runtime, notifications) {
                    println!("{message}");
                }
            })
            .await;
        info!(ticks, "tick loop stopped");

        self.print_effects()?;
        let saved = self.runtime.save_all()?;
        info!(saved, "party saved");
        Ok(())
    }
}

fn drain(runtime: &Runtime, notifications: &mut NotificationReceiver) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(notification) = notifications.try_recv() {
        let Some(text) = runtime.render(&notification) else {
            continue;
        };
        let recipient = runtime
            .actor(notification.recipient())
            .map(|actor| actor.name.as_str())
            .unwrap_or("Someone");
        messages.push(format!("{recipient}: {text}"));
    }
    messages
}
