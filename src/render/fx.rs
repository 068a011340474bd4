//! Post-processing materials
//!
//! Two full-frame passes, each switched on in the config:
//! - Outline: a 1 px dark edge around every opaque pixel of the sprite
//!   layer, drawn while compositing it over the sky.
//! - Vignette: darkens the corners of the finished frame on its way to
//!   the window.
//!
//! A shader that fails to compile only disables its effect.

use macroquad::prelude::*;

const VERTEX: &str = r#"#version 100
attribute vec3 position;
attribute vec2 texcoord;
attribute vec4 color0;

varying lowp vec2 uv;
varying lowp vec4 color;

uniform mat4 Model;
uniform mat4 Projection;

void main() {
    gl_Position = Projection * Model * vec4(position, 1);
    color = color0 / 255.0;
    uv = texcoord;
}
"#;

const OUTLINE_FRAGMENT: &str = r#"#version 100
precision lowp float;

varying vec2 uv;
varying vec4 color;

uniform sampler2D Texture;
uniform vec2 TexelSize;
uniform vec4 OutlineColor;

void main() {
    vec4 here = texture2D(Texture, uv);
    if (here.a > 0.0) {
        gl_FragColor = here * color;
        return;
    }
    float around = texture2D(Texture, uv + vec2(TexelSize.x, 0.0)).a
        + texture2D(Texture, uv - vec2(TexelSize.x, 0.0)).a
        + texture2D(Texture, uv + vec2(0.0, TexelSize.y)).a
        + texture2D(Texture, uv - vec2(0.0, TexelSize.y)).a;
    gl_FragColor = around > 0.0 ? OutlineColor : vec4(0.0);
}
"#;

const VIGNETTE_FRAGMENT: &str = r#"#version 100
precision lowp float;

varying vec2 uv;
varying vec4 color;

uniform sampler2D Texture;
uniform float Strength;

void main() {
    vec4 here = texture2D(Texture, uv) * color;
    float d = distance(uv, vec2(0.5));
    float shade = mix(1.0 - Strength, 1.0, smoothstep(0.8, 0.2, d));
    gl_FragColor = vec4(here.rgb * shade, here.a);
}
"#;

/// How dark the vignette corners get
const VIGNETTE_STRENGTH: f32 = 0.45;
const OUTLINE_COLOR: Color = Color::new(0.08, 0.05, 0.1, 1.0);

fn build(name: &str, fragment: &str, uniforms: Vec<UniformDesc>) -> Option<Material> {
    let source = ShaderSource::Glsl { vertex: VERTEX, fragment };
    match load_material(source, MaterialParams { uniforms, ..Default::default() }) {
        Ok(material) => Some(material),
        Err(e) => {
            log::warn!("{} shader unavailable, effect disabled: {}", name, e);
            None
        }
    }
}

pub struct PostFx {
    outline: Option<Material>,
    vignette: Option<Material>,
}

impl PostFx {
    pub fn new(canvas: Vec2) -> Self {
        let outline = build(
            "Outline",
            OUTLINE_FRAGMENT,
            vec![
                UniformDesc::new("TexelSize", UniformType::Float2),
                UniformDesc::new("OutlineColor", UniformType::Float4),
            ],
        );
        if let Some(material) = &outline {
            material.set_uniform("TexelSize", vec2(1.0 / canvas.x, 1.0 / canvas.y));
            let Color { r, g, b, a } = OUTLINE_COLOR;
            material.set_uniform("OutlineColor", vec4(r, g, b, a));
        }

        let vignette = build(
            "Vignette",
            VIGNETTE_FRAGMENT,
            vec![UniformDesc::new("Strength", UniformType::Float1)],
        );
        if let Some(material) = &vignette {
            material.set_uniform("Strength", VIGNETTE_STRENGTH);
        }

        Self { outline, vignette }
    }

    /// Run `draw` with the outline material when `enabled`.
    pub fn with_outline(&self, enabled: bool, draw: impl FnOnce()) {
        with_material(self.outline.as_ref().filter(|_| enabled), draw);
    }

    /// Run `draw` with the vignette material when `enabled`.
    pub fn with_vignette(&self, enabled: bool, draw: impl FnOnce()) {
        with_material(self.vignette.as_ref().filter(|_| enabled), draw);
    }
}

fn with_material(material: Option<&Material>, draw: impl FnOnce()) {
    match material {
        Some(material) => {
            gl_use_material(material);
            draw();
            gl_use_default_material();
        }
        None => draw(),
    }
}
