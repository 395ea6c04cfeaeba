//! On-screen preview of a finished composite. Any key closes the window.

use ::image::{DynamicImage, RgbImage};
use iced::widget::{container, image as picture};
use iced::{Element, Event, Length, Size, Subscription, Task, event, keyboard, window};

pub fn show(title: &str, composite: &RgbImage) -> iced::Result {
    let (width, height) = composite.dimensions();
    let rgba = DynamicImage::ImageRgb8(composite.clone()).to_rgba8();
    let handle = picture::Handle::from_rgba(width, height, rgba.into_raw());
    let title = if title.is_empty() {
        "Result grid".to_string()
    } else {
        title.to_string()
    };

    iced::application(
        move || Preview {
            title: title.clone(),
            handle: handle.clone(),
        },
        Preview::update,
        Preview::view,
    )
    .title(Preview::title)
    .subscription(Preview::subscription)
    .window(window::Settings {
        size: Size::new(width as f32, height as f32),
        ..Default::default()
    })
    .run()
}

struct Preview {
    title: String,
    handle: picture::Handle,
}

#[derive(Debug, Clone)]
enum Message {
    KeyPressed,
}

impl Preview {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::KeyPressed => iced::exit(),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        container(picture(self.handle.clone()))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Keyboard(keyboard::Event::KeyPressed { .. }) => Some(Message::KeyPressed),
            _ => None,
        })
    }
}
