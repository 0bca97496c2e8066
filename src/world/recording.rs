//! An adapter that records every call instead of building anything

use cgmath::{Quaternion, Vector3};

use super::{
    BackgroundSettings, EntityHandle, FogSettings, LightSpec, Placement, WorldAdapter,
};
use crate::gfx::{GeometryBuffer, MaterialDesc};

/// One recorded adapter call
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    CreateContainer {
        handle: EntityHandle,
        parent: Option<EntityHandle>,
        placement: Placement,
        tag: Option<String>,
    },
    CreateMesh {
        handle: EntityHandle,
        parent: Option<EntityHandle>,
        geometry: GeometryBuffer,
        material: MaterialDesc,
        placement: Placement,
        tag: Option<String>,
    },
    CreateLight {
        handle: EntityHandle,
        parent: Option<EntityHandle>,
        light: LightSpec,
        tag: Option<String>,
    },
    SetBackground(BackgroundSettings),
    SetFog(FogSettings),
    SetViewpoint {
        position: Vector3<f32>,
        rotation: Quaternion<f32>,
        field_of_view: f32,
        description: String,
    },
}

impl AdapterCall {
    /// Handle of the created entity, for creation calls
    pub fn handle(&self) -> Option<EntityHandle> {
        match self {
            AdapterCall::CreateContainer { handle, .. }
            | AdapterCall::CreateMesh { handle, .. }
            | AdapterCall::CreateLight { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    /// Parent passed to a creation call
    pub fn parent(&self) -> Option<EntityHandle> {
        match self {
            AdapterCall::CreateContainer { parent, .. }
            | AdapterCall::CreateMesh { parent, .. }
            | AdapterCall::CreateLight { parent, .. } => *parent,
            _ => None,
        }
    }

    /// `DEF` name passed to a creation call
    pub fn tag(&self) -> Option<&str> {
        match self {
            AdapterCall::CreateContainer { tag, .. }
            | AdapterCall::CreateMesh { tag, .. }
            | AdapterCall::CreateLight { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }
}

/// Records calls and hands out sequential handles starting at 1
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    calls: Vec<AdapterCall>,
    next_handle: u64,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[AdapterCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<AdapterCall> {
        self.calls
    }

    /// Number of entity-creating calls
    pub fn entity_count(&self) -> usize {
        self.calls.iter().filter(|c| c.handle().is_some()).count()
    }

    /// The recorded call that created `handle`
    pub fn find(&self, handle: EntityHandle) -> Option<&AdapterCall> {
        self.calls.iter().find(|c| c.handle() == Some(handle))
    }

    fn allocate(&mut self) -> EntityHandle {
        self.next_handle += 1;
        EntityHandle(self.next_handle)
    }
}

impl WorldAdapter for RecordingAdapter {
    fn create_container_entity(
        &mut self,
        parent: Option<EntityHandle>,
        placement: &Placement,
        tag: Option<&str>,
    ) -> EntityHandle {
        let handle = self.allocate();
        self.calls.push(AdapterCall::CreateContainer {
            handle,
            parent,
            placement: *placement,
            tag: tag.map(str::to_string),
        });
        handle
    }

    fn create_mesh_entity(
        &mut self,
        parent: Option<EntityHandle>,
        geometry: &GeometryBuffer,
        material: &MaterialDesc,
        placement: &Placement,
        tag: Option<&str>,
    ) -> EntityHandle {
        let handle = self.allocate();
        self.calls.push(AdapterCall::CreateMesh {
            handle,
            parent,
            geometry: geometry.clone(),
            material: material.clone(),
            placement: *placement,
            tag: tag.map(str::to_string),
        });
        handle
    }

    fn create_light_entity(
        &mut self,
        parent: Option<EntityHandle>,
        light: &LightSpec,
        tag: Option<&str>,
    ) -> EntityHandle {
        let handle = self.allocate();
        self.calls.push(AdapterCall::CreateLight {
            handle,
            parent,
            light: light.clone(),
            tag: tag.map(str::to_string),
        });
        handle
    }

    fn set_background(&mut self, settings: &BackgroundSettings) {
        self.calls.push(AdapterCall::SetBackground(settings.clone()));
    }

    fn set_fog(&mut self, settings: &FogSettings) {
        self.calls.push(AdapterCall::SetFog(settings.clone()));
    }

    fn set_viewpoint(
        &mut self,
        position: Vector3<f32>,
        rotation: Quaternion<f32>,
        field_of_view: f32,
        description: &str,
    ) {
        self.calls.push(AdapterCall::SetViewpoint {
            position,
            rotation,
            field_of_view,
            description: description.to_string(),
        });
    }
}
