// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Renderer interface: what the session manager asks the map and list to draw.

use serde::{Deserialize, Serialize};

use crate::models::{Location, Workout, WorkoutView};

/// Map and list drawing sink.
pub trait Renderer: Send {
    /// Draw a marker with an open popup for a workout.
    fn show_marker(&mut self, workout: &Workout);

    /// Add a workout to the list.
    fn show_list_entry(&mut self, workout: &Workout);

    /// Pan the map to a workout.
    fn recenter_on(&mut self, location: Location, zoom: u8);

    /// Initial map view once the position is known.
    fn set_view(&mut self, _center: Location, _zoom: u8) {}

    /// Open the workout form for a clicked location.
    fn show_form(&mut self, _location: Location) {}

    /// Close and clear the workout form.
    fn hide_form(&mut self) {}

    /// User-visible notice.
    fn alert(&mut self, _message: &str) {}
}

/// A drawing instruction, as sent to a browser front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RenderCommand {
    SetView {
        center: Location,
        zoom: u8,
    },
    ShowMarker {
        id: String,
        location: Location,
        popup_content: String,
        popup_class: String,
    },
    ShowListEntry {
        workout: WorkoutView,
    },
    RecenterOn {
        location: Location,
        zoom: u8,
    },
    ShowForm {
        location: Location,
    },
    HideForm,
    Alert {
        message: String,
    },
}

/// Renderer that records commands until they are drained.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<RenderCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Take every recorded command, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drop queued markers and list entries, keeping view and alert commands.
    pub fn discard_workouts(&mut self) {
        self.commands.retain(|c| {
            !matches!(
                c,
                RenderCommand::ShowMarker { .. } | RenderCommand::ShowListEntry { .. }
            )
        });
    }
}

impl Renderer for CommandBuffer {
    fn show_marker(&mut self, workout: &Workout) {
        self.commands.push(RenderCommand::ShowMarker {
            id: workout.id().to_string(),
            location: workout.location(),
            popup_content: workout.popup_content(),
            popup_class: workout.kind().popup_class(),
        });
    }

    fn show_list_entry(&mut self, workout: &Workout) {
        self.commands.push(RenderCommand::ShowListEntry {
            workout: workout.view(),
        });
    }

    fn recenter_on(&mut self, location: Location, zoom: u8) {
        self.commands
            .push(RenderCommand::RecenterOn { location, zoom });
    }

    fn set_view(&mut self, center: Location, zoom: u8) {
        self.commands.push(RenderCommand::SetView { center, zoom });
    }

    fn show_form(&mut self, location: Location) {
        self.commands.push(RenderCommand::ShowForm { location });
    }

    fn hide_form(&mut self) {
        self.commands.push(RenderCommand::HideForm);
    }

    fn alert(&mut self, message: &str) {
        self.commands.push(RenderCommand::Alert {
            message: message.to_string(),
        });
    }
}
