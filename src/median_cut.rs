use crate::color::QuantColor;

#[inline]
fn axis_value(c: &QuantColor, axis: usize) -> f32 {
    match axis {
        0 => c.r,
        1 => c.g,
        2 => c.b,
        _ => c.a,
    }
}

/// A box of weighted colors for median cut subdivision.
#[derive(Debug, Clone)]
struct ColorBox {
    entries: Vec<(QuantColor, f32)>, // (color, occurrence weight)
}

impl ColorBox {
    fn new(entries: Vec<(QuantColor, f32)>) -> Self {
        Self { entries }
    }

    fn total_weight(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Range (max - min) along each axis of the quantizer space.
    fn ranges(&self) -> [f32; 4] {
        let mut min = [f32::MAX; 4];
        let mut max = [f32::MIN; 4];

        for (c, _) in &self.entries {
            for axis in 0..4 {
                let v = axis_value(c, axis);
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
        }

        [
            max[0] - min[0],
            max[1] - min[1],
            max[2] - min[2],
            max[3] - min[3],
        ]
    }

    fn widest_axis(&self) -> (usize, f32) {
        let ranges = self.ranges();
        let mut axis = 0;
        for i in 1..4 {
            if ranges[i] > ranges[axis] {
                axis = i;
            }
        }
        (axis, ranges[axis])
    }

    /// Split priority: heavy boxes with a wide spread split first.
    fn priority(&self) -> f32 {
        self.total_weight() * self.widest_axis().1
    }

    fn centroid(&self) -> QuantColor {
        let mut sum = [0.0f64; 4];
        let mut w_sum = 0.0f64;

        for (c, w) in &self.entries {
            let w = *w as f64;
            sum[0] += c.r as f64 * w;
            sum[1] += c.g as f64 * w;
            sum[2] += c.b as f64 * w;
            sum[3] += c.a as f64 * w;
            w_sum += w;
        }

        if w_sum < 1e-10 {
            return QuantColor::new(0.0, 0.0, 0.0, 0.0);
        }

        QuantColor::new(
            (sum[0] / w_sum) as f32,
            (sum[1] / w_sum) as f32,
            (sum[2] / w_sum) as f32,
            (sum[3] / w_sum) as f32,
        )
    }

    /// Split along the widest axis at the weighted median.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (axis, _) = self.widest_axis();

        self.entries.sort_by(|a, b| {
            axis_value(&a.0, axis)
                .partial_cmp(&axis_value(&b.0, axis))
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let half_weight = self.total_weight() / 2.0;
        let mut accumulated = 0.0f32;
        let mut split_idx = 1;

        for (i, (_, w)) in self.entries.iter().enumerate() {
            accumulated += w;
            if accumulated >= half_weight && i + 1 < self.entries.len() {
                split_idx = i + 1;
                break;
            }
        }

        split_idx = split_idx.max(1).min(self.entries.len() - 1);

        let right = self.entries.split_off(split_idx);
        (ColorBox::new(self.entries), ColorBox::new(right))
    }
}

/// Weighted median cut.
///
/// Produces up to `max_colors` centroids. When the input already has
/// `max_colors` or fewer entries they are returned as-is. `refine_rounds`
/// k-means passes are run over the result.
pub fn median_cut(
    samples: Vec<(QuantColor, f32)>,
    max_colors: usize,
    refine_rounds: usize,
) -> Vec<QuantColor> {
    if samples.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    if samples.len() <= max_colors {
        return samples.into_iter().map(|(c, _)| c).collect();
    }

    let mut boxes = Vec::with_capacity(max_colors);
    boxes.push(ColorBox::new(samples));

    while boxes.len() < max_colors {
        let best_idx = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.entries.len() >= 2)
            .max_by(|(_, a), (_, b)| {
                a.priority()
                    .partial_cmp(&b.priority())
                    .unwrap_or(core::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i);

        let Some(idx) = best_idx else {
            break;
        };

        let to_split = boxes.swap_remove(idx);
        let (left, right) = to_split.split();
        boxes.push(left);
        boxes.push(right);
    }

    let mut centroids: Vec<QuantColor> = boxes.iter().map(|b| b.centroid()).collect();

    if refine_rounds > 0 {
        centroids = kmeans_refine(centroids, &boxes, refine_rounds);
    }

    centroids
}

/// Weighted k-means over all box entries, seeded with the box centroids.
fn kmeans_refine(
    mut centroids: Vec<QuantColor>,
    boxes: &[ColorBox],
    rounds: usize,
) -> Vec<QuantColor> {
    let all_entries: Vec<&(QuantColor, f32)> = boxes.iter().flat_map(|b| &b.entries).collect();

    for _ in 0..rounds {
        let k = centroids.len();
        let mut sums = vec![[0.0f64; 4]; k];
        let mut weights = vec![0.0f64; k];

        for &(c, w) in &all_entries {
            let nearest = nearest_index(&centroids, *c);
            let w = *w as f64;
            sums[nearest][0] += c.r as f64 * w;
            sums[nearest][1] += c.g as f64 * w;
            sums[nearest][2] += c.b as f64 * w;
            sums[nearest][3] += c.a as f64 * w;
            weights[nearest] += w;
        }

        for i in 0..k {
            if weights[i] > 1e-10 {
                centroids[i] = QuantColor::new(
                    (sums[i][0] / weights[i]) as f32,
                    (sums[i][1] / weights[i]) as f32,
                    (sums[i][2] / weights[i]) as f32,
                    (sums[i][3] / weights[i]) as f32,
                );
            }
        }
    }

    centroids
}

/// Index of the centroid closest to `color`. First match wins on ties.
pub(crate) fn nearest_index(centroids: &[QuantColor], color: QuantColor) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f32::MAX;
    for (i, c) in centroids.iter().enumerate() {
        let d = color.distance_sq(*c);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
        }
    }
    best_idx
}
