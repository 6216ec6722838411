#[macro_export]
macro_rules! make_colour {
    ($NAME:ident [$R:literal, $G:literal, $B:literal]) => {
        pub const $NAME: self::Rgba = self::Rgba {
            r: $R,
            g: $G,
            b: $B,
            a: 255,
        };
    };
    ($NAME:ident [$R:literal, $G:literal, $B:literal, $A:literal]) => {
        pub const $NAME: self::Rgba = self::Rgba {
            r: $R,
            g: $G,
            b: $B,
            a: $A,
        };
    };
}

/// A straight (non-premultiplied) 8-bit RGBA pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<(u8, u8, u8)> for Rgba {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgba { r, g, b, a: 255 }
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Rgba { r, g, b, a }
    }
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    make_colour! { TRANSPARENT      [0,   0,   0,   0  ] }

    // Greys
    make_colour! { WHITE            [255, 255, 255] }
    make_colour! { SILVER           [192, 192, 192] }
    make_colour! { GRAY             [128, 128, 128] }
    make_colour! { DIM_GRAY         [105, 105, 105] }
    make_colour! { SLATE_GREY       [112, 128, 144] }
    make_colour! { BLACK            [0,   0,   0  ] }

    // Primaries and friends
    make_colour! { RED              [255, 0  , 0  ] }
    make_colour! { CRIMSON          [220, 20 , 60 ] }
    make_colour! { ORANGE           [255, 165, 0  ] }
    make_colour! { GOLD             [255, 215, 0  ] }
    make_colour! { YELLOW           [255, 255, 0  ] }
    make_colour! { GREEN            [0  , 128, 0  ] }
    make_colour! { LIME             [0  , 255, 0  ] }
    make_colour! { CYAN             [0  , 255, 255] }
    make_colour! { BLUE             [0  , 0  , 255] }
    make_colour! { SKY_BLUE         [135, 206, 235] }
    make_colour! { PURPLE           [128, 0  , 128] }
    make_colour! { MAGENTA          [255, 0  , 255] }
    make_colour! { BROWN            [165, 42 , 42 ] }
}
