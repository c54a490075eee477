//! The closed set of queued task variants.

use crate::battle::input::{InputContexts, PromptInput};
use crate::battle::narration::Narration;
use crate::battle::state::ParticipantId;
use crate::config::BattleConfig;
use crate::event_queue::Task;

/// Everything a task needs from whoever drives its queue.
pub trait TaskHost {
    /// Payload of [`BattleTask::Immediate`] tasks on this host's queues.
    type Command;

    /// Milliseconds elapsed in the current host frame.
    fn frame_time(&self) -> f32;
    fn config(&self) -> &BattleConfig;
    fn narration(&mut self) -> &mut Narration;
    fn animated_value(&mut self, target: AnimatedValue) -> Option<&mut f32>;
    /// `None` on hosts that never show prompts.
    fn prompt_input(&mut self) -> Option<&mut PromptInput>;
    fn input_contexts(&mut self) -> &mut dyn InputContexts;
    fn execute(&mut self, command: Self::Command);
}

/// A value a [`ValueAnimation`] can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedValue {
    Hp(ParticipantId),
}

#[derive(Debug)]
pub enum BattleTask<C> {
    TextReveal(TextReveal),
    ValueAnimation(ValueAnimation),
    SelectionPrompt(SelectionPrompt),
    Immediate(ImmediateAction<C>),
}

impl<C> BattleTask<C> {
    pub fn text(text: impl Into<String>) -> Self {
        BattleTask::TextReveal(TextReveal::new(text.into()))
    }

    pub fn animate_hp(target: ParticipantId, delta: f32) -> Self {
        BattleTask::ValueAnimation(ValueAnimation::new(AnimatedValue::Hp(target), delta))
    }

    pub fn prompt(context: &str, option_count: usize, columns: usize, cancelable: bool) -> Self {
        BattleTask::SelectionPrompt(SelectionPrompt {
            context: context.to_string(),
            option_count,
            columns,
            cancelable,
        })
    }

    pub fn immediate(command: C) -> Self {
        BattleTask::Immediate(ImmediateAction {
            command: Some(command),
        })
    }

    /// The text of a queued or showing [`TextReveal`].
    pub fn text_content(&self) -> Option<&str> {
        match self {
            BattleTask::TextReveal(reveal) => Some(&reveal.text),
            _ => None,
        }
    }
}

impl<H: TaskHost> Task<H> for BattleTask<H::Command> {
    fn on_start(&mut self, host: &mut H) {
        match self {
            BattleTask::TextReveal(task) => task.on_start(host),
            BattleTask::ValueAnimation(task) => task.on_start(host),
            BattleTask::SelectionPrompt(task) => task.on_start(host),
            BattleTask::Immediate(task) => {
                if let Some(command) = task.command.take() {
                    host.execute(command);
                }
            }
        }
    }

    fn tick(&mut self, host: &mut H) -> bool {
        match self {
            BattleTask::TextReveal(task) => task.tick(host),
            BattleTask::ValueAnimation(task) => task.tick(host),
            BattleTask::SelectionPrompt(task) => task.tick(host),
            BattleTask::Immediate(_) => true,
        }
    }
}

/// Runs a command when started and finishes on the same tick.
#[derive(Debug)]
pub struct ImmediateAction<C> {
    command: Option<C>,
}

impl<C> ImmediateAction<C> {
    pub fn command(&self) -> Option<&C> {
        self.command.as_ref()
    }
}

/// Shows a line in the text box, revealing one character per `char_delay_ms`.
#[derive(Debug)]
pub struct TextReveal {
    text: String,
    char_count: usize,
    elapsed_ms: f32,
}

impl TextReveal {
    pub fn new(text: String) -> Self {
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            elapsed_ms: 0.0,
        }
    }

    fn on_start<H: TaskHost>(&mut self, host: &mut H) {
        self.elapsed_ms = 0.0;
        host.narration().begin(self.text.clone());
    }

    fn tick<H: TaskHost>(&mut self, host: &mut H) -> bool {
        self.elapsed_ms += host.frame_time();
        let char_delay = host.config().char_delay_ms;
        let hold = host.config().text_hold_ms;

        let revealed = if char_delay <= 0.0 {
            self.char_count
        } else {
            ((self.elapsed_ms / char_delay) as usize).min(self.char_count)
        };
        host.narration().reveal_to(revealed);

        revealed == self.char_count && self.elapsed_ms >= self.char_count as f32 * char_delay + hold
    }
}

/// Moves a value towards `start + delta` in frame-sized steps whose size
/// grows with the square root of the total distance.
#[derive(Debug)]
pub struct ValueAnimation {
    target: AnimatedValue,
    delta: f32,
    final_value: f32,
    speed: f32,
    accumulated_ms: f32,
}

impl ValueAnimation {
    pub fn new(target: AnimatedValue, delta: f32) -> Self {
        Self {
            target,
            delta,
            final_value: 0.0,
            speed: 0.0,
            accumulated_ms: 0.0,
        }
    }

    pub fn target(&self) -> AnimatedValue {
        self.target
    }

    fn on_start<H: TaskHost>(&mut self, host: &mut H) {
        let divisor = host.config().hp_animation_divisor;
        let Some(value) = host.animated_value(self.target) else {
            tracing::warn!(target = ?self.target, "animated value is gone; skipping animation");
            self.final_value = f32::NAN;
            return;
        };
        let initial = *value;
        self.final_value = (initial + self.delta).max(0.0);
        self.speed = (self.final_value - initial).abs().sqrt() / divisor;
        self.accumulated_ms = 0.0;
    }

    fn tick<H: TaskHost>(&mut self, host: &mut H) -> bool {
        if self.final_value.is_nan() {
            return true;
        }
        self.accumulated_ms += host.frame_time();
        let frame_ms = host.config().animation_frame_ms;
        if self.accumulated_ms < frame_ms {
            return false;
        }
        self.accumulated_ms = 0.0;

        let epsilon = host.config().animation_snap_epsilon;
        let (final_value, speed) = (self.final_value, self.speed);
        let Some(value) = host.animated_value(self.target) else {
            return true;
        };

        let distance = final_value - *value;
        if distance.abs() < epsilon || distance.abs() <= speed {
            *value = final_value;
            return true;
        }
        *value += speed * distance.signum();
        false
    }
}

/// Waits for the host's buffered keys to pick an option (or cancel).
///
/// The named input context is enabled while the prompt is current.
#[derive(Debug)]
pub struct SelectionPrompt {
    context: String,
    option_count: usize,
    columns: usize,
    cancelable: bool,
}

impl SelectionPrompt {
    fn on_start<H: TaskHost>(&mut self, host: &mut H) {
        host.input_contexts().enable(&self.context);
        let (count, columns, cancelable) = (self.option_count, self.columns, self.cancelable);
        if let Some(input) = host.prompt_input() {
            input.begin(count, columns, cancelable);
        }
    }

    fn tick<H: TaskHost>(&mut self, host: &mut H) -> bool {
        let resolved = match host.prompt_input() {
            Some(input) => input.process_keys().is_some(),
            None => {
                tracing::warn!(context = %self.context, "selection prompt on a host without input");
                true
            }
        };
        if resolved {
            host.input_contexts().disable(&self.context);
        }
        resolved
    }
}
