use crate::lighting::{PointLight, NR_POINT_LIGHTS};
use nalgebra_glm::{Mat4, Vec3};
use strum::{Display, EnumCount, EnumIter};

/// Ground slab footprint and thickness.
pub const GROUND_HALF_EXTENT: f32 = 10.5;
pub const GROUND_BOTTOM: f32 = -0.1;
pub const GROUND_TOP: f32 = 0.0;

pub const CLEAR_COLOR: (f32, f32, f32, f32) = (0.1, 0.1, 0.1, 1.0);

/// A placed model. Variants are in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum Prop {
    Campfire,
    RedCampfire,
    Orb,
    BlueCampfire,
    DemonForm,
    Shooter,
    Mage,
    Frostbolt,
    Dwarf,
    Portal,
}

fn placed(position: Vec3, yaw_radians: f32, scale: f32) -> Mat4 {
    let model = glm::translate(&Mat4::identity(), &position);
    let model = glm::rotate_y(&model, yaw_radians);
    glm::scale(&model, &Vec3::from_element(scale))
}

/// Model matrices for every prop at `time` seconds, in draw order. Campfires
/// and the orb are placed on their lights.
pub fn prop_transforms(
    time: f32,
    lights: &[PointLight; NR_POINT_LIGHTS],
) -> [(Prop, Mat4); Prop::COUNT] {
    let mage = placed(glm::vec3(-4.0, 0.0, -4.0), 95f32.to_radians(), 1.0);
    let frostbolt = glm::translate(
        &glm::scale(&mage, &Vec3::from_element(0.4)),
        &glm::vec3(0.0, 1.5, 9.0),
    );

    [
        (Prop::Campfire, placed(lights[1].position, 0.0, 0.5)),
        (Prop::RedCampfire, placed(lights[2].position, 0.0, 0.5)),
        (Prop::Orb, placed(lights[0].position, time * 2.0, 0.3)),
        (Prop::BlueCampfire, placed(lights[3].position, 0.0, 0.2)),
        (
            Prop::DemonForm,
            placed(glm::vec3(7.5, -2.0, -5.0), 135f32.to_radians(), 0.5),
        ),
        (
            Prop::Shooter,
            placed(glm::vec3(4.0, 0.0, 5.0), 163f32.to_radians(), 1.0),
        ),
        (Prop::Mage, mage),
        (Prop::Frostbolt, frostbolt),
        (
            Prop::Dwarf,
            placed(glm::vec3(9.0, 0.0, -7.0), (-45f32).to_radians(), 1.0),
        ),
        (
            Prop::Portal,
            placed(glm::vec3(-4.8, 0.0, 4.8), 135f32.to_radians(), 0.1),
        ),
    ]
}

/// View matrix with the translation stripped, so the skybox stays centred on
/// the camera.
pub fn skybox_view(view: &Mat4) -> Mat4 {
    glm::mat3_to_mat4(&glm::mat4_to_mat3(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::point_lights;
    use strum::IntoEnumIterator;

    fn origin_of(model: &Mat4) -> Vec3 {
        (model * glm::vec4(0.0, 0.0, 0.0, 1.0)).xyz()
    }

    fn assert_close(a: &Vec3, b: &Vec3) {
        assert!(glm::distance(a, b) < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn every_prop_is_drawn_once_in_order() {
        let lights = point_lights(0.0);
        let props: Vec<Prop> = prop_transforms(0.0, &lights).iter().map(|p| p.0).collect();
        assert_eq!(props, Prop::iter().collect::<Vec<_>>());
    }

    #[test]
    fn light_props_follow_their_lights() {
        let time = 7.25;
        let lights = point_lights(time);
        let transforms = prop_transforms(time, &lights);
        let origin = |prop: Prop| {
            let (_, model) = transforms.iter().find(|(p, _)| *p == prop).unwrap();
            origin_of(model)
        };

        assert_close(&origin(Prop::Orb), &lights[0].position);
        assert_close(&origin(Prop::Campfire), &lights[1].position);
        assert_close(&origin(Prop::RedCampfire), &lights[2].position);
        assert_close(&origin(Prop::BlueCampfire), &lights[3].position);
    }

    #[test]
    fn orb_spins_twice_as_fast_as_time() {
        let time = 0.75;
        let lights = point_lights(time);
        let orb = prop_transforms(time, &lights)[2].1;
        let x_axis = (orb * glm::vec4(1.0, 0.0, 0.0, 0.0)).xyz() / 0.3;
        let angle = 2.0 * time;
        assert_close(&x_axis, &glm::vec3(angle.cos(), 0.0, -angle.sin()));
    }

    #[test]
    fn frostbolt_is_held_out_in_front_of_the_mage() {
        let lights = point_lights(0.0);
        let transforms = prop_transforms(0.0, &lights);
        let frostbolt = origin_of(&transforms[Prop::Frostbolt as usize].1);

        // (0, 1.5, 9) scaled by 0.4 then turned 95 degrees about +Y.
        let yaw = 95f32.to_radians();
        let expected = glm::vec3(-4.0 + 3.6 * yaw.sin(), 0.6, -4.0 + 3.6 * yaw.cos());
        assert_close(&frostbolt, &expected);
    }

    #[test]
    fn skybox_view_drops_translation() {
        let view = glm::look_at(
            &glm::vec3(3.0, 4.0, 5.0),
            &glm::vec3(0.0, 0.0, 0.0),
            &Vec3::y(),
        );
        let sky = skybox_view(&view);
        let origin = glm::vec4(0.0, 0.0, 0.0, 1.0);
        assert_eq!(sky * origin, origin);
        assert_eq!(glm::mat4_to_mat3(&sky), glm::mat4_to_mat3(&view));
    }
}
