use std::time::Instant;

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{GenericImageView, ImageReader};
use pic_bilinear::{
    Backend, BilinearConvention, BilinearResizer, ImageStore, ImageStoreMut, ThreadingPolicy,
};

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "./assets/test_1.jpg".to_string());
    let scale = args
        .next()
        .and_then(|x| x.parse::<f32>().ok())
        .unwrap_or(0.5f32);

    let img = ImageReader::open(&path).unwrap().decode().unwrap();
    let dimensions = img.dimensions();
    let transient = img.to_rgba8();
    let bytes = transient.as_raw();

    let new_width = ((dimensions.0 as f32 * scale) as usize).max(1);
    let new_height = ((dimensions.1 as f32 * scale) as usize).max(1);

    println!("Available backends: {:?}", Backend::available());

    let mut resizer = BilinearResizer::new();
    resizer.set_threading_policy(ThreadingPolicy::Adaptive);
    resizer.set_convention(BilinearConvention::PixelCenter);

    let store =
        ImageStore::<u8, 4>::borrow(bytes, dimensions.0 as usize, dimensions.1 as usize).unwrap();
    let mut target = ImageStoreMut::<u8, 4>::alloc(new_width, new_height).unwrap();

    let start_time = Instant::now();
    resizer.resize(&store, &mut target).unwrap();
    let elapsed_time = start_time.elapsed();
    println!("Bilinear resizer: {:.2?}", elapsed_time);

    let mut vc = bytes.to_vec();
    let start_time = Instant::now();
    let pixel_type: PixelType = PixelType::U8x4;
    let src_image = Image::from_slice_u8(dimensions.0, dimensions.1, &mut vc, pixel_type).unwrap();
    let mut dst_image = Image::new(new_width as u32, new_height as u32, pixel_type);
    let mut fast_resizer = Resizer::new();
    fast_resizer
        .resize(
            &src_image,
            &mut dst_image,
            &ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
                .use_alpha(false),
        )
        .unwrap();
    let elapsed_time = start_time.elapsed();
    println!("Fast image resize: {:.2?}", elapsed_time);

    image::save_buffer(
        "converted.png",
        target.as_bytes(),
        new_width as u32,
        new_height as u32,
        image::ColorType::Rgba8,
    )
    .unwrap();
}
