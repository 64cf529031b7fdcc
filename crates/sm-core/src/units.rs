use uom::si::f64::{
    Acceleration as UomAcceleration, Force as UomForce, Length as UomLength, Mass as UomMass,
    MassRate as UomMassRate,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Mass = UomMass;
/// N·s/m reduces to kg/s, so viscous damping coefficients are mass rates.
pub type Damping = UomMassRate;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn n(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

/// Damping coefficient from N·s/m.
#[inline]
pub fn ns_per_m(v: f64) -> Damping {
    use uom::si::mass_rate::kilogram_per_second;
    Damping::new::<kilogram_per_second>(v)
}

/// Spring constant in N/m from a force and the extension it produces.
pub fn stiffness(force: Force, extension: Length) -> f64 {
    use uom::si::force::newton;
    use uom::si::length::meter;
    force.get::<newton>() / extension.get::<meter>()
}

/// Spring constant in N/m from the static deflection of a hanging mass.
pub fn stiffness_from_static_deflection(mass: Mass, deflection: Length) -> f64 {
    let weight = mass * constants::g0();
    stiffness(weight, deflection)
}

pub mod constants {
    use super::*;

    pub const G0_MPS2: f64 = 9.806_65;

    #[inline]
    pub fn g0() -> Accel {
        use uom::si::acceleration::meter_per_second_squared;
        Accel::new::<meter_per_second_squared>(G0_MPS2)
    }
}
