use ripple_life::Simulation;
use wgpu::{BindGroupLayoutEntry, Buffer, BufferUsages, Device, Limits, Queue};

use crate::gpu::GpuError;

/// Cell flag bits, one `u32` per cell in the storage buffer
pub const CELL_ALIVE: u32 = 1;
pub const CELL_QUEUED: u32 = 1 << 1;

const FLAG_BYTES: u64 = std::mem::size_of::<u32>() as u64;

/// Render parameters passed to the fragment shader (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    pub grid_width: u32,
    pub grid_height: u32,
    /// 0 = plain cells, 1 = highlight queued cells
    pub show_queue: u32,
    pub _padding: u32,
}

/// Per-cell flags and render parameters on the GPU
pub struct CellBuffers {
    pub cells_buffer: Buffer,
    pub params_buffer: Buffer,
    pub width: u32,
    pub height: u32,
    scratch: Vec<u32>,
}

impl CellBuffers {
    /// Allocate storage for a `width` x `height` grid, refusing grids the
    /// device cannot bind in one storage buffer.
    pub fn new(device: &Device, width: usize, height: usize) -> Result<Self, GpuError> {
        let bytes = storage_size(width, height, &device.limits())?;
        let too_large = || GpuError::GridTooLarge {
            width,
            height,
            bytes,
            limit: u32::MAX as u64,
        };
        let (grid_width, grid_height) = (
            u32::try_from(width).map_err(|_| too_large())?,
            u32::try_from(height).map_err(|_| too_large())?,
        );

        let cells_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cell-flags-buffer"),
            size: bytes,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render-params-buffer"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            cells_buffer,
            params_buffer,
            width: grid_width,
            height: grid_height,
            scratch: Vec::with_capacity(width * height),
        })
    }

    /// Bindings as seen by the fragment shader: flags at 0, params at 1.
    pub fn layout_entries() -> [BindGroupLayoutEntry; 2] {
        let entry = |binding, ty| BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        [
            entry(0, wgpu::BufferBindingType::Storage { read_only: true }),
            entry(1, wgpu::BufferBindingType::Uniform),
        ]
    }

    pub fn bind_group_entries(&self) -> [wgpu::BindGroupEntry<'_>; 2] {
        [
            wgpu::BindGroupEntry {
                binding: 0,
                resource: self.cells_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: self.params_buffer.as_entire_binding(),
            },
        ]
    }

    /// Upload the current grid and queue
    pub fn upload(&mut self, queue: &Queue, simulation: &Simulation) {
        encode_cells(simulation, &mut self.scratch);
        queue.write_buffer(&self.cells_buffer, 0, bytemuck::cast_slice(&self.scratch));
    }

    pub fn update_params(&self, queue: &Queue, show_queue: bool) {
        let params = RenderParams {
            grid_width: self.width,
            grid_height: self.height,
            show_queue: show_queue as u32,
            _padding: 0,
        };
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));
    }
}

/// Bytes of flag storage for a grid, checked against the device limits.
pub fn storage_size(width: usize, height: usize, limits: &Limits) -> Result<u64, GpuError> {
    let limit = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
    let bytes = (width as u64)
        .checked_mul(height as u64)
        .and_then(|cells| cells.checked_mul(FLAG_BYTES));

    match bytes {
        Some(bytes) if bytes <= limit => Ok(bytes),
        _ => Err(GpuError::GridTooLarge {
            width,
            height,
            bytes: bytes.unwrap_or(u64::MAX),
            limit,
        }),
    }
}

/// Write the flags of every cell, row-major, into `out`.
pub fn encode_cells(simulation: &Simulation, out: &mut Vec<u32>) {
    let grid = simulation.grid();
    out.clear();
    out.extend(grid.coords().map(|coord| {
        if simulation.cell_state(coord.x() as i64, coord.y() as i64) {
            CELL_ALIVE
        } else {
            0
        }
    }));
    for &coord in simulation.queue_snapshot() {
        out[grid.index_of(coord)] |= CELL_QUEUED;
    }
}
