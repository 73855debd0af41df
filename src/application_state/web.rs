//! # Web Bindings
//!
//! A thin `wasm-bindgen` facade over [`Sandbox`] for the browser page. The page
//! owns the canvas, pointer lock and file dialogs; it forwards input here as
//! plain numbers and byte arrays and reads the instance batches back for
//! drawing.

use cgmath::{Point3, Vector3};
use wasm_bindgen::prelude::*;

use super::{config::SandboxConfig, CommandOutcome, Sandbox, SandboxCommand};
use crate::{
    engine_state::voxels::{
        block::{block_type::Appearance, BlockId},
        raycast::Ray,
    },
    error::VoxelError,
};

fn to_js(error: VoxelError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// A sandbox session exposed to JavaScript.
#[wasm_bindgen]
pub struct WebSandbox {
    sandbox: Sandbox,
    last_file_name: String,
}

#[wasm_bindgen]
impl WebSandbox {
    /// Starts a session from an optional JSON config document.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebSandbox, JsValue> {
        let config = match config_json {
            Some(json) => SandboxConfig::from_json(&json).map_err(to_js)?,
            None => SandboxConfig::default(),
        };
        let sandbox = Sandbox::start(config).map_err(to_js)?;
        Ok(WebSandbox {
            sandbox,
            last_file_name: String::new(),
        })
    }

    /// Moves the view; returns whether it is standing on ground.
    pub fn move_view(&mut self, px: f32, py: f32, pz: f32, dx: f32, dy: f32, dz: f32) -> bool {
        self.sandbox
            .move_view(Point3::new(px, py, pz), Vector3::new(dx, dy, dz))
    }

    /// Feet height after the last standing check.
    pub fn view_height(&self) -> f32 {
        self.sandbox.view().position.y
    }

    /// Breaks the first block along the ray; returns whether one was removed.
    pub fn break_at(
        &mut self,
        ox: f32,
        oy: f32,
        oz: f32,
        dx: f32,
        dy: f32,
        dz: f32,
    ) -> Result<bool, JsValue> {
        let ray = Ray::new(Point3::new(ox, oy, oz), Vector3::new(dx, dy, dz));
        match self.sandbox.handle(SandboxCommand::BreakAt(ray)).map_err(to_js)? {
            CommandOutcome::Broken(removed) => Ok(removed.is_some()),
            _ => Ok(false),
        }
    }

    /// Places the held block along the ray; returns whether one was placed.
    pub fn place_at(
        &mut self,
        ox: f32,
        oy: f32,
        oz: f32,
        dx: f32,
        dy: f32,
        dz: f32,
    ) -> Result<bool, JsValue> {
        let ray = Ray::new(Point3::new(ox, oy, oz), Vector3::new(dx, dy, dz));
        let command = SandboxCommand::PlaceAt(ray, self.sandbox.held());
        match self.sandbox.handle(command).map_err(to_js)? {
            CommandOutcome::Placed(cell) => Ok(cell.is_some()),
            _ => Ok(false),
        }
    }

    /// Changes the held block.
    pub fn select_held(&mut self, id: BlockId) -> Result<(), JsValue> {
        self.sandbox.select_held(id).map_err(to_js)
    }

    /// The held block.
    pub fn held(&self) -> BlockId {
        self.sandbox.held()
    }

    /// Encodes the world; the suggested name is available from
    /// [`WebSandbox::last_file_name`] afterwards.
    pub fn save(&mut self) -> Result<Vec<u8>, JsValue> {
        match self.sandbox.handle(SandboxCommand::RequestSave).map_err(to_js)? {
            CommandOutcome::Saved(saved) => {
                self.last_file_name = saved.file_name;
                Ok(saved.bytes)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Download name of the most recent save.
    pub fn last_file_name(&self) -> String {
        self.last_file_name.clone()
    }

    /// Replaces the world with a snapshot; returns the number of cells restored.
    pub fn load(&mut self, bytes: Vec<u8>) -> Result<usize, JsValue> {
        match self
            .sandbox
            .handle(SandboxCommand::RequestLoad(bytes))
            .map_err(to_js)?
        {
            CommandOutcome::Loaded(count) => Ok(count),
            _ => Ok(0),
        }
    }

    /// Number of non-empty cells.
    pub fn block_count(&self) -> usize {
        self.sandbox.store().len()
    }

    /// Ids that currently have a batch, ascending.
    pub fn batch_ids(&self) -> Vec<BlockId> {
        self.sandbox
            .renderer()
            .batches()
            .map(|batch| batch.block_id())
            .collect()
    }

    /// Colour of a batch as `0xRRGGBB`, or `None` for textured or missing ids.
    pub fn batch_color(&self, id: BlockId) -> Option<u32> {
        match self.sandbox.renderer().batch(id)?.appearance() {
            Appearance::Color(color) => Some(color),
            Appearance::Texture(_) => None,
        }
    }

    /// Instance centres of a batch as packed little-endian `f32` triples.
    pub fn instance_bytes(&self, id: BlockId) -> Vec<u8> {
        self.sandbox
            .renderer()
            .batch(id)
            .map(|batch| batch.instance_bytes().to_vec())
            .unwrap_or_default()
    }
}
