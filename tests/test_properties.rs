use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spine_detect::common::{ClassLabel, SkBox, SkDetection};
use spine_detect::detection_processing::{apply_nms, filter_by_confidence, CoordinateMapper, LetterboxInfo};

fn random_detections(rng: &mut StdRng, n: usize) -> Vec<SkDetection> {
    (0..n)
        .map(|_| {
            let bbox = SkBox::new(
                rng.gen_range(0. ..600.),
                rng.gen_range(0. ..600.),
                rng.gen_range(1. ..120.),
                rng.gen_range(1. ..120.),
            );
            let class_id = rng.gen_range(0..5);
            let label = ClassLabel::Known(format!("L{}", class_id + 1));
            SkDetection::new(bbox, rng.gen_range(0. ..1.), class_id, label)
        })
        .collect()
}

#[test]
fn letterbox_mapping_round_trips() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let (w, h) = (rng.gen_range(1..4000u32), rng.gen_range(1..4000u32));
        let s = rng.gen_range(32..1280u32);
        let info = LetterboxInfo::new(s, w, h).unwrap();
        let mapper = CoordinateMapper::new(info);

        let x = rng.gen_range(0. ..w as f32);
        let y = rng.gen_range(0. ..h as f32);
        let (mx, my) = info.image_to_model(x, y);
        assert!(mx >= -1e-3 && mx <= s as f32 + 1e-3);
        assert!(my >= -1e-3 && my <= s as f32 + 1e-3);

        let back = mapper.model_to_image_box(&SkBox::new(mx, my, 0., 0.));
        let tol = 1e-3 * (w.max(h) as f32);
        assert!((back.x - x).abs() <= tol, "x {} -> {} (w={w} h={h} s={s})", x, back.x);
        assert!((back.y - y).abs() <= tol, "y {} -> {} (w={w} h={h} s={s})", y, back.y);
    }
}

#[test]
fn nms_is_idempotent_and_never_grows() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let n = rng.gen_range(0..60);
        let iou = rng.gen_range(0.1..0.9);
        let input = random_detections(&mut rng, n);

        let once = apply_nms(input.clone(), iou);
        let twice = apply_nms(once.clone(), iou);

        assert!(once.len() <= input.len());
        assert_eq!(once, twice);
    }
}

#[test]
fn nms_survivors_do_not_overlap_past_threshold() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..100 {
        let iou = rng.gen_range(0.1..0.9);
        let kept = apply_nms(random_detections(&mut rng, 50), iou);

        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(a.bbox.iou(&b.bbox) <= iou);
            }
        }
        assert!(kept.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }
}

#[test]
fn confidence_filter_is_monotone() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..100 {
        let input = random_detections(&mut rng, 40);
        let t1 = rng.gen_range(0. ..1.);
        let t2 = rng.gen_range(t1..=1.);

        let low = filter_by_confidence(input.clone(), t1);
        let high = filter_by_confidence(input, t2);

        assert!(high.len() <= low.len());
        assert!(high.iter().all(|d| low.contains(d)));
        assert!(low.iter().all(|d| d.confidence >= t1));
    }
}
