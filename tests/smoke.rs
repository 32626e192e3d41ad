//! Workspace smoke test: a full headless day driven end to end.

use stormscape_engine::{SceneConfig, ScenePreset, WeatherScene, WeatherState};
use stormscape_testkit::DrawRecorder;

#[test]
fn a_full_simulated_day_stays_sane() {
    let mut scene = WeatherScene::new(SceneConfig::default(), 2024);
    let mut recorder = DrawRecorder::new();

    // time_scale 0.01 means one day per 100 time-units; 2000 frames at
    // dt 0.05 covers exactly one day.
    for _ in 0..2000 {
        scene.advance(0.05);
        scene.render(&mut recorder);

        let env = scene.env();
        assert!((0.0..1.0).contains(&env.time_of_day));
        assert!((0.0..=1.0).contains(&env.lightning_flash));
        assert!((0.0..=1.0).contains(&scene.fog_density()));
        assert!(scene.cloud_count() <= scene.config().max_clouds);
        assert!(scene.particle_count() <= scene.config().max_particles);
        assert!(scene.bolt_count() <= scene.config().max_bolts);
    }

    assert_eq!(recorder.frames_completed(), 2000);
}

#[test]
fn presets_drive_distinct_scenes() {
    let mut summer = WeatherScene::new(SceneConfig::default(), 5);
    summer.apply_preset(ScenePreset::SummerDay);
    let mut storm = WeatherScene::new(SceneConfig::default(), 5);
    storm.apply_preset(ScenePreset::StormyEvening);

    assert_eq!(summer.env().state, WeatherState::Clear);
    assert_eq!(storm.env().state, WeatherState::Thunderstorm);

    summer.advance(0.016);
    storm.advance(0.016);

    // The storm sky is strictly darker than the summer noon sky.
    assert!(storm.sky_color().luminance() < summer.sky_color().luminance());
    // And carries far more cloud mass.
    assert!(storm.cloud_count() > summer.cloud_count());
}
