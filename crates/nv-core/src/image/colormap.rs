//! Colormaps for single-channel rasters
//!
//! Each map is a pre-computed 256-entry RGB lookup table indexed by the 8-bit
//! normalized sample. Ids follow OpenCV's `COLORMAP_*` numbering so producers
//! can keep passing the ids they already use.
//!
//! The tables are built from analytic curves that follow each map's shape;
//! they are close to, but not sample-exact with, OpenCV's tables. Parula (12),
//! Cividis (17), Twilight (18, 19) and DeepGreen (21) have no analytic form
//! here and are not built in.

/// Colormap applied to 8-bit single-channel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    Autumn,
    Bone,
    Jet,
    Winter,
    Rainbow,
    Ocean,
    Summer,
    Spring,
    Cool,
    Hsv,
    Pink,
    Hot,
    Magma,
    Inferno,
    Plasma,
    Viridis,
    Turbo,
}

impl Colormap {
    /// Every built-in map, in id order
    pub const ALL: [Colormap; 17] = [
        Self::Autumn,
        Self::Bone,
        Self::Jet,
        Self::Winter,
        Self::Rainbow,
        Self::Ocean,
        Self::Summer,
        Self::Spring,
        Self::Cool,
        Self::Hsv,
        Self::Pink,
        Self::Hot,
        Self::Magma,
        Self::Inferno,
        Self::Plasma,
        Self::Viridis,
        Self::Turbo,
    ];

    /// Look up a map by its OpenCV id
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|map| map.id() == id)
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Autumn => 0,
            Self::Bone => 1,
            Self::Jet => 2,
            Self::Winter => 3,
            Self::Rainbow => 4,
            Self::Ocean => 5,
            Self::Summer => 6,
            Self::Spring => 7,
            Self::Cool => 8,
            Self::Hsv => 9,
            Self::Pink => 10,
            Self::Hot => 11,
            Self::Magma => 13,
            Self::Inferno => 14,
            Self::Plasma => 15,
            Self::Viridis => 16,
            Self::Turbo => 20,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Autumn => "Autumn",
            Self::Bone => "Bone",
            Self::Jet => "Jet",
            Self::Winter => "Winter",
            Self::Rainbow => "Rainbow",
            Self::Ocean => "Ocean",
            Self::Summer => "Summer",
            Self::Spring => "Spring",
            Self::Cool => "Cool",
            Self::Hsv => "HSV",
            Self::Pink => "Pink",
            Self::Hot => "Hot",
            Self::Magma => "Magma",
            Self::Inferno => "Inferno",
            Self::Plasma => "Plasma",
            Self::Viridis => "Viridis",
            Self::Turbo => "Turbo",
        }
    }

    /// Map an 8-bit intensity to RGB
    #[inline]
    pub fn apply(&self, value: u8) -> [u8; 3] {
        self.lut()[usize::from(value)]
    }

    #[inline]
    fn lut(&self) -> &'static [[u8; 3]; 256] {
        match self {
            Self::Autumn => &AUTUMN_LUT,
            Self::Bone => &BONE_LUT,
            Self::Jet => &JET_LUT,
            Self::Winter => &WINTER_LUT,
            Self::Rainbow => &RAINBOW_LUT,
            Self::Ocean => &OCEAN_LUT,
            Self::Summer => &SUMMER_LUT,
            Self::Spring => &SPRING_LUT,
            Self::Cool => &COOL_LUT,
            Self::Hsv => &HSV_LUT,
            Self::Pink => &PINK_LUT,
            Self::Hot => &HOT_LUT,
            Self::Magma => &MAGMA_LUT,
            Self::Inferno => &INFERNO_LUT,
            Self::Plasma => &PLASMA_LUT,
            Self::Viridis => &VIRIDIS_LUT,
            Self::Turbo => &TURBO_LUT,
        }
    }
}

static AUTUMN_LUT: [[u8; 3]; 256] = build_lut(Colormap::Autumn);
static BONE_LUT: [[u8; 3]; 256] = build_lut(Colormap::Bone);
static WINTER_LUT: [[u8; 3]; 256] = build_lut(Colormap::Winter);
static RAINBOW_LUT: [[u8; 3]; 256] = build_lut(Colormap::Rainbow);
static OCEAN_LUT: [[u8; 3]; 256] = build_lut(Colormap::Ocean);
static SUMMER_LUT: [[u8; 3]; 256] = build_lut(Colormap::Summer);
static SPRING_LUT: [[u8; 3]; 256] = build_lut(Colormap::Spring);
static COOL_LUT: [[u8; 3]; 256] = build_lut(Colormap::Cool);
static HSV_LUT: [[u8; 3]; 256] = build_lut(Colormap::Hsv);
static PINK_LUT: [[u8; 3]; 256] = build_lut(Colormap::Pink);
static TURBO_LUT: [[u8; 3]; 256] = build_lut(Colormap::Turbo);
static JET_LUT: [[u8; 3]; 256] = build_lut(Colormap::Jet);
static HOT_LUT: [[u8; 3]; 256] = build_lut(Colormap::Hot);
static MAGMA_LUT: [[u8; 3]; 256] = build_lut(Colormap::Magma);
static INFERNO_LUT: [[u8; 3]; 256] = build_lut(Colormap::Inferno);
static PLASMA_LUT: [[u8; 3]; 256] = build_lut(Colormap::Plasma);
static VIRIDIS_LUT: [[u8; 3]; 256] = build_lut(Colormap::Viridis);

const fn build_lut(map: Colormap) -> [[u8; 3]; 256] {
    let mut lut = [[0u8; 3]; 256];
    let mut i = 0;
    while i < 256 {
        let v = i as f64 / 255.0;
        let [r, g, b] = match map {
            Colormap::Autumn => [1.0, v, 0.0],
            Colormap::Bone => bone(v),
            Colormap::Winter => [0.0, v, 1.0 - v / 2.0],
            // red through violet
            Colormap::Rainbow => hue_to_rgb(v * 0.75),
            Colormap::Ocean => [3.0 * v - 2.0, const_abs((3.0 * v - 1.0) / 2.0), v],
            Colormap::Summer => [v, 0.5 + v / 2.0, 0.4],
            Colormap::Spring => [1.0, v, 1.0 - v],
            Colormap::Cool => [v, 1.0 - v, 1.0],
            Colormap::Hsv => hue_to_rgb(v),
            Colormap::Pink => pink(v),
            Colormap::Turbo => turbo(v),
            Colormap::Jet => jet(v),
            Colormap::Hot => hot(v),
            Colormap::Magma => magma(v),
            Colormap::Inferno => inferno(v),
            Colormap::Plasma => plasma(v),
            Colormap::Viridis => viridis(v),
        };
        lut[i] = [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b)];
        i += 1;
    }
    lut
}

// Jet: blue -> cyan -> yellow -> red
const fn jet(v: f64) -> [f64; 3] {
    [
        1.5 - const_abs(4.0 * v - 3.0),
        1.5 - const_abs(4.0 * v - 2.0),
        1.5 - const_abs(4.0 * v - 1.0),
    ]
}

// Hot: black -> red -> yellow -> white
const fn hot(v: f64) -> [f64; 3] {
    [3.0 * v, 3.0 * v - 1.0, 3.0 * v - 2.0]
}

// Magma: black -> purple -> pink -> white
const fn magma(v: f64) -> [f64; 3] {
    [const_sqrt(v) * 0.7 + v * 0.3, v * v * 0.78, (0.3 + v * 0.7) * v]
}

// Inferno: black -> purple -> red -> yellow
const fn inferno(v: f64) -> [f64; 3] {
    [const_sqrt(v), v * v * v * 0.78, (1.0 - v) * v * 4.0]
}

// Plasma: blue -> purple -> orange -> yellow
const fn plasma(v: f64) -> [f64; 3] {
    [0.05 + v * 0.95, v * v, 1.0 - v * 0.7]
}

// Viridis: purple -> blue -> green -> yellow
const fn viridis(v: f64) -> [f64; 3] {
    [0.267 + v * (0.993 - 0.267), v * 0.906, 0.329 + v * 0.186]
}

// Bone: grey with a blue tint, 7/8 grey plus 1/8 reversed hot
const fn bone(v: f64) -> [f64; 3] {
    let [hr, hg, hb] = hot(v);
    [
        (7.0 * v + clamp_unit(hb)) / 8.0,
        (7.0 * v + clamp_unit(hg)) / 8.0,
        (7.0 * v + clamp_unit(hr)) / 8.0,
    ]
}

// Pink: sepia tones, sqrt of 2/3 grey plus 1/3 hot
const fn pink(v: f64) -> [f64; 3] {
    let [hr, hg, hb] = hot(v);
    [
        const_sqrt((2.0 * v + clamp_unit(hr)) / 3.0),
        const_sqrt((2.0 * v + clamp_unit(hg)) / 3.0),
        const_sqrt((2.0 * v + clamp_unit(hb)) / 3.0),
    ]
}

// Turbo: polynomial fit of the Turbo map
const fn turbo(v: f64) -> [f64; 3] {
    [
        0.13572138
            + v * (4.61539260
                + v * (-42.66032258 + v * (132.13108234 + v * (-152.94239396 + v * 59.28637943)))),
        0.09140261
            + v * (2.19418839
                + v * (4.84296658 + v * (-14.18503333 + v * (4.27729857 + v * 2.82956604)))),
        0.10667330
            + v * (12.64194608
                + v * (-60.58204836 + v * (110.36276771 + v * (-89.90310912 + v * 27.34824973)))),
    ]
}

/// Fully saturated color for hue `h` in 0.0-1.0 (0 and 1 are red)
const fn hue_to_rgb(h: f64) -> [f64; 3] {
    let h6 = h * 6.0;
    [
        const_abs(h6 - 3.0) - 1.0,
        2.0 - const_abs(h6 - 2.0),
        2.0 - const_abs(h6 - 4.0),
    ]
}

const fn clamp_unit(v: f64) -> f64 {
    if v < 0.0 {
        0.0
    } else if v > 1.0 {
        1.0
    } else {
        v
    }
}

/// Scale a 0.0-1.0 value to u8, saturating (const fn compatible)
const fn unit_to_u8(v: f64) -> u8 {
    let v = v * 255.0;
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        (v + 0.5) as u8
    }
}

const fn const_abs(x: f64) -> f64 {
    if x < 0.0 {
        -x
    } else {
        x
    }
}

/// Newton-Raphson sqrt, good to f64 precision over 0.0-1.0
const fn const_sqrt(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut guess = x / 2.0 + 0.5;
    let mut i = 0;
    while i < 20 {
        guess = (guess + x / guess) / 2.0;
        i += 1;
    }
    guess
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(Colormap::from_id(2), Some(Colormap::Jet));
        assert_eq!(Colormap::from_id(16), Some(Colormap::Viridis));
        assert_eq!(Colormap::from_id(0), Some(Colormap::Autumn));
        assert_eq!(Colormap::from_id(20), Some(Colormap::Turbo));
        // Parula and Twilight are not built in
        assert_eq!(Colormap::from_id(12), None);
        assert_eq!(Colormap::from_id(18), None);
        assert_eq!(Colormap::from_id(-1), None);
        for map in Colormap::ALL {
            assert_eq!(Colormap::from_id(map.id()), Some(map));
        }
    }

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(Colormap::Jet.apply(0), [0, 0, 128]);
        assert_eq!(Colormap::Jet.apply(255), [128, 0, 0]);
    }

    #[test]
    fn test_hot_endpoints() {
        assert_eq!(Colormap::Hot.apply(0), [0, 0, 0]);
        assert_eq!(Colormap::Hot.apply(255), [255, 255, 255]);
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let ids: Vec<i32> = Colormap::ALL.iter().map(Colormap::id).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_linear_map_endpoints() {
        assert_eq!(Colormap::Autumn.apply(0), [255, 0, 0]);
        assert_eq!(Colormap::Autumn.apply(255), [255, 255, 0]);
        assert_eq!(Colormap::Winter.apply(0), [0, 0, 255]);
        assert_eq!(Colormap::Spring.apply(255), [255, 255, 0]);
        assert_eq!(Colormap::Cool.apply(0), [0, 255, 255]);
        assert_eq!(Colormap::Summer.apply(0), [0, 128, 102]);
    }

    #[test]
    fn test_grey_based_maps_span_black_to_white() {
        for map in [Colormap::Bone, Colormap::Pink] {
            assert_eq!(map.apply(0), [0, 0, 0], "{}", map.label());
            assert_eq!(map.apply(255), [255, 255, 255], "{}", map.label());
        }
        // bone is blue-tinted in the shadows
        let [r, _, b] = Colormap::Bone.apply(64);
        assert!(b > r);
    }

    #[test]
    fn test_hue_maps() {
        assert_eq!(Colormap::Hsv.apply(0), [255, 0, 0]);
        assert_eq!(Colormap::Hsv.apply(255), [255, 0, 0]);
        assert_eq!(Colormap::Rainbow.apply(0), [255, 0, 0]);
        assert_eq!(Colormap::Rainbow.apply(255), [128, 0, 255]);
    }

    #[test]
    fn test_turbo_runs_blue_to_dark_red() {
        let [r, g, b] = Colormap::Turbo.apply(32);
        assert!(b > r && b > g);
        let [r, g, b] = Colormap::Turbo.apply(128);
        assert!(g > r && g > b);
        assert_eq!(Colormap::Turbo.apply(255), [144, 13, 0]);
    }

    #[test]
    fn test_const_sqrt() {
        assert!((const_sqrt(0.25) - 0.5).abs() < 1e-9);
        assert!((const_sqrt(1.0) - 1.0).abs() < 1e-9);
        assert_eq!(const_sqrt(0.0), 0.0);
    }
}
