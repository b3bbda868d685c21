/// WGSL shader for instanced scene boxes: one directional light, ambient, linear fog.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // xyz: direction toward the light, w: intensity
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
    fog_color: vec4<f32>,
    // x: near, y: far, z: 1 when fog is on
    fog_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) world_pos: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.world_pos = world_pos.xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let diffuse = max(dot(in.world_normal, normalize(uniforms.light_dir.xyz)), 0.0);
    let light = uniforms.ambient.rgb
        + uniforms.light_color.rgb * diffuse * uniforms.light_dir.w;
    var rgb = in.color.rgb * light;

    if (uniforms.fog_params.z > 0.5) {
        let dist = distance(in.world_pos, uniforms.camera_pos.xyz);
        let span = max(uniforms.fog_params.y - uniforms.fog_params.x, 0.0001);
        let f = clamp((dist - uniforms.fog_params.x) / span, 0.0, 1.0);
        rgb = mix(rgb, uniforms.fog_color.rgb, f);
    }
    return vec4<f32>(rgb, in.color.a);
}
"#;
