// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walks a mind map through the whole pipeline: load, select, explore,
//! and export, printing what a host would draw at each step.

use canopy_controller::{Effect, Event, Session};
use canopy_export::{ExportError, ExportPlan, Rasterizer, export_png};
use canopy_source::{ExpandItem, recover_node};
use kurbo::Size;

/// Stand-in rasterizer: reports the bitmap it would have produced.
struct DryRun;

impl Rasterizer for DryRun {
    fn rasterize(&self, plan: &ExportPlan) -> Result<Vec<u8>, ExportError> {
        println!(
            "  rasterizing {:.0}x{:.0} px over {} background",
            plan.pixel_size.width, plan.pixel_size.height, plan.background.0
        );
        Ok(b"png bytes would go here".to_vec())
    }
}

fn describe(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::Redraw => println!("  -> redraw"),
            Effect::ShowMenu(menu) => println!(
                "  -> menu at ({:.0}, {:.0}), remove {}",
                menu.position.x,
                menu.position.y,
                if menu.remove_enabled { "enabled" } else { "disabled" }
            ),
            Effect::HideMenu => println!("  -> hide menu"),
            Effect::BeginEdit(edit) => println!("  -> edit \"{}\"", edit.text),
            Effect::Notify(message) => println!("  -> notify: {message}"),
            Effect::StartExplore { request, .. } => {
                println!("  -> explore \"{}\"", request.node_name);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A noisy response, the way generation sources actually answer.
    let response = r#"```json
    {
        "topic": "Renewable Energy",
        "children": [
            { "name": "Solar", "children": [ { "name": "Photovoltaics" } ] },
            { "name": "Wind", "children": [] },
            { "name": "Hydro", "children": [] }
        ]
    }
    ```"#;
    let node = recover_node(response)?;

    let mut session = Session::with_cell_measure(Size::new(1024.0, 768.0));
    session.load(&serde_json::to_value(&node)?)?;

    let scene = session.scene().ok_or("no scene after load")?;
    println!(
        "loaded {} nodes, {} edges, fitted at scale {:.2}",
        scene.nodes.len(),
        scene.edges.len(),
        scene.transform.scale
    );

    let wind = {
        let tree = session.tree().ok_or("no tree")?;
        tree.children_of(tree.root())[1]
    };
    println!("clicking \"Wind\":");
    describe(&session.handle(Event::ClickNode(wind)));

    println!("exploring it:");
    let effects = session.handle(Event::MenuExplore);
    describe(&effects);
    let ticket = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartExplore { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .ok_or("explore did not start")?;

    println!("exploration comes back:");
    let suggestions = vec![
        ExpandItem {
            name: "Offshore".to_owned(),
        },
        ExpandItem {
            name: "Onshore".to_owned(),
        },
    ];
    describe(&session.complete_explore(ticket, Ok(suggestions)));

    let scene = session.scene().ok_or("no scene after explore")?;
    println!("now {} nodes", scene.nodes.len());

    let root_label = {
        let tree = session.tree().ok_or("no tree")?;
        tree.label(tree.root()).unwrap_or_default().to_owned()
    };
    println!("exporting:");
    let file = export_png(&scene, &root_label, &DryRun)?;
    println!("  saved {} ({} bytes)", file.filename, file.bytes.len());

    Ok(())
}
