use crate::api::game::FrameContext;
use crate::api::types::{Message, SoundEvent};
use crate::components::entity::{Component, Entity};
use crate::core::dispatcher::{MessageDispatcher, ReceiverId};

/// Sound IDs handed to the audio collaborator.
pub mod sounds {
    use crate::api::types::SoundEvent;

    pub const INTRO: SoundEvent = SoundEvent(0);
    pub const MUSIC: SoundEvent = SoundEvent(1);
    pub const PEPPER: SoundEvent = SoundEvent(2);
    pub const INGREDIENT_STEP: SoundEvent = SoundEvent(3);
    pub const INGREDIENT_HIT: SoundEvent = SoundEvent(4);
    pub const SQUASHED: SoundEvent = SoundEvent(5);
    pub const DEATH: SoundEvent = SoundEvent(6);
    pub const VICTORY: SoundEvent = SoundEvent(7);
}

/// Which sound each bus message triggers.
const CUES: [(Message, SoundEvent); 6] = [
    (Message::GameStarted, sounds::MUSIC),
    (Message::PepperThrown, sounds::PEPPER),
    (Message::OnIngredient, sounds::INGREDIENT_STEP),
    (Message::IngredientHit, sounds::INGREDIENT_HIT),
    (Message::EnemySquashed, sounds::SQUASHED),
    (Message::Victory, sounds::VICTORY),
];

/// Turns gameplay messages into [`SoundEvent`]s. Plays nothing itself.
///
/// [`sounds::DEATH`] is emitted by the player the moment it is caught.
#[derive(Debug)]
pub struct SoundEffects {
    receiver: ReceiverId,
    intro_played: bool,
}

impl SoundEffects {
    pub fn new(dispatcher: &mut MessageDispatcher) -> Self {
        let receiver = dispatcher.register();
        for (message, _) in CUES {
            dispatcher.subscribe(message, receiver);
        }
        Self { receiver, intro_played: false }
    }
}

impl Component for SoundEffects {
    fn update(&mut self, _entity: &mut Entity, ctx: &mut FrameContext<'_>, _dt: f32) {
        if !self.intro_played {
            self.intro_played = true;
            ctx.emit_sound(sounds::INTRO);
        }

        let inbox = ctx.dispatcher.inbox(self.receiver);
        for (message, sound) in CUES {
            for _ in 0..inbox.count(message) {
                ctx.emit_sound(sound);
            }
        }
        ctx.dispatcher.clear_inbox(self.receiver);
    }
}
