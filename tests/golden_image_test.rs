#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod gpu {
    use futures::channel::oneshot;
    use ripple_ngin::{
        Demo, Duration, Session,
        config::Config,
        context::Context,
        data_structures::{
            geometry::MeshData,
            material::{Capability, Material},
            scene::{MeshNode, Scene, Transform},
            uniforms::{Color, UniformSet},
        },
        demos,
        resources::PendingTexture,
        shading::ShaderProgram,
    };

    use crate::common::test_utils::{Counting, capture, headless};

    const MAP_VERTEX: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coords: vec2<f32>,
};

@vertex
fn vs_main(v: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(v.position.xy, 0.5, 1.0);
    out.tex_coords = v.tex_coords;
    return out;
}
"#;

    const MAP_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(t_map, s_map, in.tex_coords);
}
"#;

    /// A full-screen quad showing its colour map unshaded.
    struct MapQuad {
        scene: Scene,
    }

    impl MapQuad {
        fn new(ctx: &Context, map: PendingTexture) -> Self {
            let program = ShaderProgram {
                label: "Map Shader",
                vertex: MAP_VERTEX,
                fragment: MAP_FRAGMENT,
                textured: true,
            };
            let uniforms = UniformSet::new().with("time", 0.0_f32);
            let material = Material::procedural(ctx, &program, &uniforms, Some(map), None);
            let mut scene = Scene::new();
            scene.add(MeshNode::new(
                ctx,
                "quad",
                &MeshData::plane(2.0, 2.0, 1, 1),
                material,
                Transform::new(),
            ));
            Self { scene }
        }

        fn material(&self) -> &Material {
            &self.scene.node("quad").unwrap().material
        }
    }

    impl Demo for MapQuad {
        fn config(&self) -> Config {
            black()
        }

        fn on_init(&mut self, _: &Context) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_update(&mut self, _: &mut Session, _: Duration) {}

        fn write_to_buffer(&mut self, ctx: &Context) {
            self.scene.write_to_buffer(ctx);
        }

        fn on_render(&self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>) {
            self.scene.draw(ctx, render_pass);
        }
    }

    fn black() -> Config {
        Config {
            clear_colour: Color::BLACK,
            ..Config::default()
        }
    }

    fn png(rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn centre(img: &image::RgbaImage) -> image::Rgba<u8> {
        *img.get_pixel(img.width() / 2, img.height() / 2)
    }

    #[test]
    fn should_render_clear_colour() {
        let config = Config {
            clear_colour: Color::WHITE,
            ..Config::default()
        };
        let (runtime, mut ctx, mut session, mut demo) =
            headless(Box::new(Counting::new(config)), 64, 48, Duration::ZERO);
        let img = capture(&runtime, &mut ctx, &mut session, demo.as_mut());
        assert_eq!(img.dimensions(), (64, 48));
        for pixel in img.pixels() {
            assert_eq!(*pixel, image::Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn every_demo_covers_the_centre() {
        for name in demos::NAMES {
            let demo = demos::by_name(name).unwrap();
            let clear = demo.config().clear_colour;
            let (runtime, mut ctx, mut session, mut demo) =
                headless(demo, 128, 96, Duration::from_millis(250));
            let img = capture(&runtime, &mut ctx, &mut session, demo.as_mut());
            // the sRGB target encodes the linear clear colour back to its hex value
            let background = [clear.r, clear.g, clear.b].map(|c| (c * 255.0).round() as i32);
            let c = centre(&img);
            let distance = (0..3)
                .map(|i| (c[i] as i32 - background[i]).abs())
                .max()
                .unwrap_or(0);
            assert!(distance > 2, "{name} left the centre empty: {c:?}");
        }
    }

    #[test]
    fn resize_reconfigures_offscreen_targets() {
        let (runtime, mut ctx, mut session, mut demo) =
            headless(Box::new(Counting::default()), 64, 64, Duration::ZERO);
        assert!(session.resize(200, 100));
        assert!(ctx.resize(200, 100));
        assert_eq!(ctx.size(), (200, 100));
        let img = capture(&runtime, &mut ctx, &mut session, demo.as_mut());
        assert_eq!(img.dimensions(), (200, 100));
        assert_eq!(session.projection.aspect, 2.0);
    }

    #[test]
    fn placeholder_until_map_arrives_then_swapped_in() {
        let (runtime, mut ctx, mut session, _) =
            headless(Box::new(Counting::new(black())), 32, 32, Duration::ZERO);
        let (tx, rx) = oneshot::channel();
        let mut quad = MapQuad::new(&ctx, PendingTexture::from_receiver("red.png", rx));
        assert!(quad.material().has(Capability::TexturedSurface));
        assert!(quad.material().has(Capability::ProceduralShaded));

        let img = capture(&runtime, &mut ctx, &mut session, &mut quad);
        assert!(quad.scene.is_loading());
        assert_eq!(centre(&img), image::Rgba([255, 255, 255, 255]));

        tx.send(Ok(png([255, 0, 0, 255]))).unwrap();
        let img = capture(&runtime, &mut ctx, &mut session, &mut quad);
        assert!(!quad.material().is_loading());
        assert_eq!(centre(&img), image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn undecodable_map_keeps_placeholder() {
        let (runtime, mut ctx, mut session, _) =
            headless(Box::new(Counting::new(black())), 32, 32, Duration::ZERO);
        let (tx, rx) = oneshot::channel();
        let mut quad = MapQuad::new(&ctx, PendingTexture::from_receiver("garbage.png", rx));
        tx.send(Ok(b"definitely not an image".to_vec())).unwrap();

        let img = capture(&runtime, &mut ctx, &mut session, &mut quad);
        assert!(!quad.material().is_loading());
        assert!(quad.material().has(Capability::TexturedSurface));
        assert_eq!(centre(&img), image::Rgba([255, 255, 255, 255]));
    }
}
