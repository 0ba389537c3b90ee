/// Raw signed counts as delivered by the DATAX0..DATAZ1 registers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Three-axis value. Holds raw counts, acceleration or filtered acceleration
/// depending on where it came from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector { x, y, z }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Vector {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }
}

impl From<Reading> for Vector {
    fn from(r: Reading) -> Self {
        Vector::new(r.x as f32, r.y as f32, r.z as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_into_vector() {
        let r = Reading {
            x: 250,
            y: -250,
            z: i16::MIN,
        };
        assert_eq!(Vector::from(r), Vector::new(250.0, -250.0, -32768.0));
    }

    #[test]
    fn scaled() {
        let v = Vector::new(250.0, -500.0, 0.0).scaled(0.004);
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.y + 2.0).abs() < 1e-6);
        assert_eq!(v.z, 0.0);
    }
}
