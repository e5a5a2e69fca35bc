use super::slot::Slot;

/// Starter fragment program shown before anything is loaded.
pub const DEFAULT_FRAGMENT: &str = r#"#ifdef GL_ES
precision mediump float;
#endif

uniform float   	u_time;
uniform vec2    	u_resolution;

void main() {
    vec4 color = vec4(vec3(0.0), 1.0);
    vec2 pixel = 1.0/u_resolution;
    vec2 st = gl_FragCoord.xy * pixel;

    color.rgb = vec3(st.x, st.y, abs(sin(u_time)));

    gl_FragColor = color;
}
"#;

/// Starter vertex program shown before anything is loaded.
pub const DEFAULT_VERTEX: &str = r#"#ifdef GL_ES
precision mediump float;
#endif

attribute vec4  a_position;
varying vec4    v_position;

void main() {
    v_position = a_position;
    gl_Position = a_position;
}
"#;

pub fn default_source(slot: Slot) -> &'static str {
    match slot {
        Slot::Fragment => DEFAULT_FRAGMENT,
        Slot::Vertex => DEFAULT_VERTEX,
    }
}
