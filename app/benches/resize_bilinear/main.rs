use criterion::{criterion_group, criterion_main, Criterion};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use pic_bilinear::{
    Backend, BackendSelection, BilinearResizer, ImageStore, ImageStoreMut, ThreadingPolicy,
};

const WIDTH: usize = 1920;
const HEIGHT: usize = 1080;

fn synthetic_image(channels: usize) -> Vec<u8> {
    (0..WIDTH * HEIGHT * channels)
        .map(|i| ((i * 7919) >> 3) as u8)
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let rgba = synthetic_image(4);
    let gray = synthetic_image(1);

    for backend in Backend::available() {
        c.bench_function(&format!("Bilinear RGBA downscale x2: {backend:?}"), |b| {
            let store = ImageStore::<u8, 4>::borrow(&rgba, WIDTH, HEIGHT).unwrap();
            let mut target = ImageStoreMut::<u8, 4>::alloc(WIDTH / 2, HEIGHT / 2).unwrap();
            let mut resizer = BilinearResizer::new();
            resizer.set_backend(BackendSelection::Exact(backend));
            b.iter(|| {
                resizer.resize(&store, &mut target).unwrap();
            })
        });
    }

    c.bench_function("Bilinear Gray upscale x1.5: Auto", |b| {
        let store = ImageStore::<u8, 1>::borrow(&gray, WIDTH, HEIGHT).unwrap();
        let mut target = ImageStoreMut::<u8, 1>::alloc(WIDTH * 3 / 2, HEIGHT * 3 / 2).unwrap();
        let resizer = BilinearResizer::new();
        b.iter(|| {
            resizer.resize(&store, &mut target).unwrap();
        })
    });

    c.bench_function("Bilinear RGBA downscale x2: Auto, Adaptive threads", |b| {
        let store = ImageStore::<u8, 4>::borrow(&rgba, WIDTH, HEIGHT).unwrap();
        let mut target = ImageStoreMut::<u8, 4>::alloc(WIDTH / 2, HEIGHT / 2).unwrap();
        let mut resizer = BilinearResizer::new();
        resizer.set_threading_policy(ThreadingPolicy::Adaptive);
        b.iter(|| {
            resizer.resize(&store, &mut target).unwrap();
        })
    });

    c.bench_function("Fast image resize RGBA downscale x2: Bilinear", |b| {
        let mut vc = rgba.clone();
        b.iter(|| {
            let pixel_type: PixelType = PixelType::U8x4;
            let src_image =
                Image::from_slice_u8(WIDTH as u32, HEIGHT as u32, &mut vc, pixel_type).unwrap();
            let mut dst_image = Image::new(WIDTH as u32 / 2, HEIGHT as u32 / 2, pixel_type);
            let mut resizer = Resizer::new();
            resizer
                .resize(
                    &src_image,
                    &mut dst_image,
                    &ResizeOptions::new()
                        .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
                        .use_alpha(false),
                )
                .unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
