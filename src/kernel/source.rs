//! Pure assembly of kernel shader sources.
//!
//! A kernel body is a list of WGSL statements. It is spliced into a fixed
//! fragment preamble that provides `read()` and `commit(value)`; the transfer
//! mode only flips the `PACKED_BYTES` constant, so bodies never branch on it.

use crate::{codec::float::WGSL_CODEC, transfer::mode::TransferMode};

/// Vertex entry point in [`VERTEX_WGSL`].
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point of every assembled kernel.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Fixed vertex stage: passes the quad corners through to clip space and
/// forwards their texture coordinates.
pub const VERTEX_WGSL: &str = r#"struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) texcoord: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) texcoord: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 0.0, 1.0);
    out.texcoord = texcoord;
    return out;
}
"#;

const PREAMBLE_HEAD: &str = r#"@group(0) @binding(0) var input_texture: texture_2d<f32>;
@group(0) @binding(1) var input_sampler: sampler;

var<private> texcoord: vec2<f32>;
var<private> output_texel: vec4<f32>;

"#;

const PREAMBLE_TAIL: &str = r#"
fn read() -> f32 {
    let texel = textureSampleLevel(input_texture, input_sampler, texcoord, 0.0);
    if PACKED_BYTES {
        return unpack_texel(texel);
    }
    return texel.r;
}

fn commit(value: f32) {
    if PACKED_BYTES {
        output_texel = pack_texel(value);
    } else {
        output_texel = vec4<f32>(value, 0.0, 0.0, 1.0);
    }
}

// kernel body begins here
fn run_kernel() {
"#;

const EPILOGUE: &str = r#"
}

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    texcoord = uv;
    output_texel = vec4<f32>(0.0);
    run_kernel();
    return output_texel;
}
"#;

/// A complete fragment shader built from a kernel body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelSource {
    mode: TransferMode,
    body: String,
    wgsl: String,
    body_first_line: usize,
}

impl KernelSource {
    /// Splice `body` into the preamble for `mode`.
    pub fn assemble(mode: TransferMode, body: &str) -> Self {
        let mut wgsl = String::with_capacity(
            PREAMBLE_HEAD.len() + WGSL_CODEC.len() + PREAMBLE_TAIL.len() + body.len() + 128,
        );
        wgsl.push_str(PREAMBLE_HEAD);
        wgsl.push_str(&format!(
            "const PACKED_BYTES: bool = {};\n\n",
            mode.is_packed()
        ));
        wgsl.push_str(WGSL_CODEC);
        wgsl.push_str(PREAMBLE_TAIL);
        let body_first_line = wgsl.matches('\n').count() + 1;
        wgsl.push_str(body);
        wgsl.push_str(EPILOGUE);

        Self {
            mode,
            body: body.to_string(),
            wgsl,
            body_first_line,
        }
    }

    /// Full WGSL source handed to the shader compiler.
    pub fn wgsl(&self) -> &str {
        &self.wgsl
    }

    /// The caller's body as given.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Mode the preamble was built for.
    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    /// 1-based line of the first body line inside [`wgsl`](Self::wgsl).
    pub fn body_first_line(&self) -> usize {
        self.body_first_line
    }

    /// Body lines prefixed with their line numbers in the assembled source,
    /// so they line up with compiler diagnostics.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.body.split('\n').enumerate() {
            out.push_str(&format!("{}> {}\n", self.body_first_line + i, line));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/source.rs"]
mod tests;
