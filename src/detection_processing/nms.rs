//! Greedy non-maximum suppression.

pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
}

/// Sorts by confidence (descending, stable so equal scores keep decode order),
/// then keeps a box only if its IoU with every already kept box is `<= iou_threshold`.
///
/// Runs in place and is O(k²) in the number of boxes, which stays small after
/// confidence filtering.
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32) {
    boxes.sort_by(|b1, b2| b2.confidence().total_cmp(&b1.confidence()));

    let mut current_index = 0;
    for index in 0..boxes.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            let iou = boxes[prev_index].iou(&boxes[index]);
            if iou > iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            boxes.swap(current_index, index);
            current_index += 1;
        }
    }
    boxes.truncate(current_index);
}

pub fn apply_nms<T: Nms>(mut boxes: Vec<T>, iou_threshold: f32) -> Vec<T> {
    nms(&mut boxes, iou_threshold);
    boxes
}
